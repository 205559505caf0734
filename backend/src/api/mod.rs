// =============================================================================
// HTTP transport
// =============================================================================

pub mod rest;
