//! Reference storage backends. The hosted document store sits behind the
//! repository traits in production; [`memory`] implements every trait over
//! process-local maps so the server, the CLI demo, and the tests all wire
//! the same backend.

pub mod memory;
