//! Exchange objects (spec §3/§4.9): `Xreq`, `Xmatch`/`Xmatchreq`, `Xpay` and their wire codecs.
//! These share the common [`crate::wire::FrameHeader`] at the transport level but each define
//! their own body layout, so the body codecs live here rather than in `cclib::wire`.

mod rangecoded;
mod unifloat;
mod xmatch;
mod xpay;
mod xreq;

pub use unifloat::{Round, UniFloat, match_rate_required, net_rate};
pub use xmatch::{Xmatch, Xmatchreq, XmatchStatus};
pub use xpay::Xpay;
pub use xreq::{XTX_TIME_DIVISOR, Xreq, XreqConsideration, XreqFlags, XreqType};
