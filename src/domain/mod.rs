// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that describe what the
// detector works with: documents, labels, verdicts and the
// classifier seam used by the chunked inference.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A loaded document and its optional training label
pub mod document;

// Typed failures surfaced to the user
pub mod error;

// Verdict enum and the threshold fusion policy
pub mod verdict;

// Core abstractions (traits) that other layers implement
pub mod traits;
