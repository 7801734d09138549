#![no_main]

use libfuzzer_sys::fuzz_target;
use pcpuvis::config::PipelineConfig;
use pcpuvis::counter_path::{InstanceName, ObjectSegment, Separator};
use pcpuvis::{csv_input, pipeline};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Counter path pieces must never panic on arbitrary text
        let _ = ObjectSegment::from_counter_path(input);
        let _ = InstanceName::parse(input, Separator::Hash);
        let _ = InstanceName::parse(input, Separator::Underscore);

        // Neither must the whole pipeline; errors are fine
        if let Ok(table) = csv_input::parse(input) {
            let config = PipelineConfig {
                cores: 4,
                ..Default::default()
            };
            let _ = pipeline::run(&table, &config);
        }
    }
});
