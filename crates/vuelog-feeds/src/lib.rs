//! vuelog-feeds: the collaborators around the normalization engine.
//!
//! Sources read raw lines and hand them to an [`Ingestor`], which stamps
//! each line with its capture time, normalizes it and pushes the resulting
//! line-protocol row onto the outbound queue. A separate drain loop pops
//! everything queued on a fixed interval and forwards it to a [`Sink`].
//!
//! ```text
//! source ──► Ingestor ──► queue ──► drain loop ──► Sink
//! ```

pub mod drain;
pub mod ingest;
pub mod queue;
pub mod sink;
pub mod source;

pub use drain::{run_drain, DrainStats};
pub use ingest::Ingestor;
pub use queue::{line_queue, LineQueue, QueueClosed, QueueSender};
pub use sink::{FileSink, MemorySink, Sink, StdoutSink};
pub use source::{BlockingSource, FileSource, LineSource, ReaderSource};
