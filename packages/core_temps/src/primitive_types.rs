/// Identifies a specific logical processor.
///
/// This will match the numeric identifier used by standard tooling of the operating
/// system. Within a sampling pass, slot indices are contiguous `0..N` and double as
/// processor identifiers.
pub type ProcessorId = u32;
