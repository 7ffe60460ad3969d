//! Minimal host-loop demo: a country picker over a CSV dataset.
//!
//! A real dashboarding host would render the widget and feed back user
//! interactions; here a scripted boundary stands in for the user typing
//! "den" and picking the top result.

use searchpick::{
    BoundaryEvent, CycleDriver, FuzzySource, HostCapabilities, ScriptedBoundary, SearchSelect,
    StateStore, WidgetConfig,
};

const COUNTRIES: &str = "value,title,description,image\n\
us,United States,North America,us.png\n\
de,Germany,Europe,de.png\n\
dk,Denmark,Europe,dk.png\n\
jp,Japan,Asia,jp.png\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(COUNTRIES.as_bytes())?.with_min_query_len(2);
    let config = WidgetConfig::new()
        .with_default_searchterm("")
        .with_on_submit(|value: &String| println!("submitted: {value}"));
    let mut widget = SearchSelect::new("country", config);

    let mut boundary = ScriptedBoundary::new(vec![
        BoundaryEvent::search("den"),
        BoundaryEvent::submit_index(0),
    ]);

    let driver = CycleDriver::new(8, HostCapabilities::full_only());
    let outcome = driver.run(&mut widget, &mut store, &mut boundary, &mut provider)?;

    println!("current value: {:?}", outcome.value);
    println!("render keys seen: {:?}", boundary.rendered_keys);
    Ok(())
}
