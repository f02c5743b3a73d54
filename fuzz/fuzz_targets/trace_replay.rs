#![no_main]

use libfuzzer_sys::fuzz_target;
use lineprof::dispatcher::Dispatcher;
use lineprof::record::DEFAULT_LINE_SLACK;
use lineprof::replay;
use lineprof::ManualClock;

fuzz_target!(|data: &[u8]| {
    let Ok(events) = replay::parse_trace(data) else {
        return;
    };

    let clock = ManualClock::new(0);
    let mut dispatcher = Dispatcher::new(clock.clone(), DEFAULT_LINE_SLACK);
    dispatcher.reset_single_file("a.rb");
    for event in &events {
        clock.set(event.t_us);
        dispatcher.dispatch(event.file.as_deref(), event.line);
    }
});
