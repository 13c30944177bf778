//! The fixed `CC_TAG_*` enumeration (spec §4.8/§6): a 32-bit label identifying a frame's body
//! layout. Grounded on `original_source/source/cclib/src/CCobjdefs.h`.

/// A block-type frame (not decoded by this crate beyond its header — block assembly is a
/// consensus concern, spec §1 Non-goals).
pub const CC_TAG_BLOCK: u32 = 0xCC00_0001;
pub const CC_BLOCK_FLAG: u32 = 0x0001_0000;
/// A mint transaction: no inputs, implicit `key_id = 0`.
pub const CC_TAG_MINT: u32 = 0xCC02_0001;
/// An ordinary same-domain spend transaction.
pub const CC_TAG_TX: u32 = 0xCC04_0001;
/// A cross-domain spend transaction (outputs/inputs carry an explicit `M_domain` field).
pub const CC_TAG_TX_XDOMAIN: u32 = 0xCC06_0001;
/// Exchange-layer tags (spec §4.9).
pub const CC_TAG_XREQ: u32 = 0xCC08_0001;
pub const CC_TAG_XMATCH: u32 = 0xCC08_0002;
pub const CC_TAG_XPAY: u32 = 0xCC08_0003;
/// Query tags (spec §4.11's `tx-query-*` family).
pub const CC_TAG_QUERY_ADDRESS: u32 = 0xCC0A_0001;
pub const CC_TAG_QUERY_SERIALNUM: u32 = 0xCC0A_0002;
pub const CC_TAG_QUERY_PARAMETERS: u32 = 0xCC0A_0003;

/// The transaction type enumeration (spec §6): `CC_TYPE_* in 0..12`.
pub const CC_TYPE_MINT: u32 = 0;
pub const CC_TYPE_TXPAY: u32 = 1;
pub const CC_TYPE_XCX_NAKED_BUY: u32 = 2;
pub const CC_TYPE_XCX_NAKED_SELL: u32 = 3;
pub const CC_TYPE_XCX_SIMPLE_BUY: u32 = 4;
pub const CC_TYPE_XCX_SIMPLE_SELL: u32 = 5;
pub const CC_TYPE_XCX_REQ_BUY: u32 = 6;
pub const CC_TYPE_XCX_REQ_SELL: u32 = 7;
pub const CC_TYPE_XCX_MINING_BUY: u32 = 8;
pub const CC_TYPE_XCX_MINING_SELL: u32 = 9;
pub const CC_TYPE_XCX_MINING_TRADE: u32 = 10;
pub const CC_TYPE_XCX_PAYMENT: u32 = 11;

/// Whether `tag` identifies a transaction frame this module's `tx_body` codec can decode (as
/// opposed to an exchange object or a query, which use their own codecs).
pub fn is_tx_tag(tag: u32) -> bool {
    matches!(tag, CC_TAG_MINT | CC_TAG_TX | CC_TAG_TX_XDOMAIN)
}

/// Whether `tag` carries an explicit per-output/per-input `M_domain` field (spec §4.8: "[M_domain
/// for xdomain tags]").
pub fn carries_domain(tag: u32) -> bool {
    tag == CC_TAG_TX_XDOMAIN
}
