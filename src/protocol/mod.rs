//! The protocol module contains the components responsible for the Lambdatronic
//! wire protocol: the command vocabulary, frame encoding and decoding, and the
//! engine that runs a session on top of a transport.

pub mod command;
pub mod engine;
pub mod frame;

pub use command::{Command, LoginMode, Selector};
pub use engine::{EngineStats, ProtocolEngine};
pub use frame::{checksum, decode, encode, Frame};
