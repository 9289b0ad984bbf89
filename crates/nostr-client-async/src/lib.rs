//! Small async primitives shared by the networking and collector crates:
//! an unbounded FIFO channel and a one-shot completion handle.

pub mod channel;
pub mod completion;

pub use channel::{channel, ChannelClosed, Receiver, Sender};
pub use completion::{Completion, CompletionDropped, CompletionHandle};
