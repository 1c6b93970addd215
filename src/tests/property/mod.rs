//! Property-based tests for Booksmith
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `book_gen_props`: Tests for the content synthesis engine
//!   - Outline is deterministic for the same inputs
//!   - Chapter indices are contiguous; charts and tables are well formed
//!   - Words per chapter are clamped
//!   - Long-form text stays in the tolerance band
//!   - No sentence repeats within a template-pool cycle
//!
//! ## Configuration
//!
//! Case counts are set per `proptest!` block and kept low; long-form
//! synthesis is CPU-bound.

mod book_gen_props;
