pub mod decode;
pub mod summary;
pub mod warmup;

use std::path::Path;

use tracebench_core::Result;
use tracebench_core::model::trace::Trace;
use tracebench_core::pattern::BenchmarkMarker;

/// Load a captured trace dump and strip warm-up iterations. This is the
/// single point where file I/O and filtering happen; everything downstream
/// works on the returned traces.
pub fn load(path: &Path, warmup: usize, marker: &BenchmarkMarker) -> Result<Vec<Trace>> {
    let mut traces = decode::read_dump(path)?;
    warmup::exclude_warmup(&mut traces, warmup, marker);
    Ok(traces)
}
