//! Chat protocol engine: buffering, framing, codec and response tracking

pub mod buffer;
pub mod codec;
pub mod framer;
pub mod response;

pub use buffer::{FramedBuffer, BUFFER_CAPACITY};
pub use codec::RequestCodec;
pub use framer::{Lines, DELIMITER};
pub use response::{ResponseMachine, ResponseState, Step};
