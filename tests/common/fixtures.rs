//! Packets captured from a production poller.

/// SNMPv2c GetResponse for hrStorageSize.58 (community "logicmonitor").
///
/// The value is sent as a five-octet INTEGER, `00 ae 7a d9 00`, which a
/// four-octet decoder refuses.
pub const V2_RESPONSE_HEX: &str = "3037020101040c6c6f6769636d6f6e69746f72a22402044a0b703002010002010030163014060b2b0601020119020301053a020500ae7ad900";

/// SNMPv3 message copied from a packet capture as a plain hex stream.
///
/// msgID is `00 b3 94` and msgMaxSize `00 ff e3`; the scoped PDU is
/// encrypted.
pub const V3_REQUEST_HEX: &str = "3081990201033010020300b394020300ffe304010302010304433041041180001f8880747ad850ad42f458000000000201030203127864040c6c6f6769636d6f6e69746f72040cba93353b14bbec229ab207e90408ab7b114a9577e554043d568d55586b8a091788e7d71889424a764515e2ed399426ce8f73be03bfe7f36af661969f550a520c822fd45b3049aa8cb44ba1c2d4450c8e0bb30062df";

/// Split a plain hex stream into the colon-separated form packet loggers
/// print.
pub fn to_separated(stream: &str) -> String {
    stream
        .as_bytes()
        .chunks(2)
        .map(|pair| std::str::from_utf8(pair).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(":")
}
