/*!
Data structures produced by the message bus decoder.
*/
mod error;
mod evpn;
mod value;
mod version;

pub use error::*;
pub use evpn::*;
pub use value::*;
pub use version::*;
