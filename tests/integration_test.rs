//! End-to-end widget cycle tests: scripted boundary, fuzzy provider, and the
//! cycle driver standing in for a rerun-driven host.

use std::io::Write;
use std::time::{Duration, Instant};

use searchpick::{
    BoundaryEvent, CycleDriver, FuzzySource, HostCapabilities, RerunScope, ScriptedBoundary,
    SearchSelect, StateStore, WidgetConfig,
};

fn country_csv() -> &'static str {
    "value,title,description,image\n\
     us,United States,North America,us.png\n\
     de,Germany,Europe,de.png\n\
     dk,Denmark,Europe,dk.png\n\
     jp,Japan,Asia,jp.png\n"
}

fn driver() -> CycleDriver {
    CycleDriver::new(8, HostCapabilities::full_only())
}

#[test]
fn search_then_submit_resolves_to_dataset_value() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let mut widget: SearchSelect<String> = SearchSelect::new("country", WidgetConfig::new());
    let mut boundary = ScriptedBoundary::new(vec![
        BoundaryEvent::search("den"),
        BoundaryEvent::submit_index(0),
    ]);

    let outcome = driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();

    assert_eq!(outcome.value.as_deref(), Some("dk"));
    assert!(outcome.rerun.is_none());
}

#[test]
fn render_key_changes_only_when_results_change() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let mut widget: SearchSelect<String> = SearchSelect::new("country", WidgetConfig::new());
    let mut boundary = ScriptedBoundary::new(vec![BoundaryEvent::search("jap")]);

    driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();

    // First render was pre-search, second render follows the result update.
    assert_eq!(boundary.rendered_keys, vec!["country:0", "country:1"]);
    assert_eq!(boundary.last_option_count, 1);

    // An idle cycle must not move the key.
    let mut idle = ScriptedBoundary::idle();
    driver()
        .run(&mut widget, &mut store, &mut idle, &mut provider)
        .unwrap();
    assert_eq!(idle.rendered_keys, vec!["country:1"]);
}

#[test]
fn reset_returns_widget_to_defaults() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let config = WidgetConfig::new().with_default_value("us".to_string());
    let mut widget = SearchSelect::new("country", config);
    let mut boundary = ScriptedBoundary::new(vec![
        BoundaryEvent::search("ger"),
        BoundaryEvent::submit_index(0),
        BoundaryEvent::reset(),
    ]);

    let outcome = driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();
    assert_eq!(outcome.value.as_deref(), Some("de"));
    assert_eq!(boundary.remaining(), 1, "submit ends the first interaction");

    // The host schedules another interaction; the scripted reset plays now.
    let outcome = driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();

    assert_eq!(outcome.value.as_deref(), Some("us"));
    let state = store.get("country").unwrap();
    assert!(state.results.is_empty());
}

#[test]
fn duplicate_search_events_cost_one_provider_call() {
    let mut store = StateStore::new();
    let calls = std::rc::Rc::new(std::cell::RefCell::new(0usize));
    let sink = std::rc::Rc::clone(&calls);
    let mut provider = move |query: &str,
                             _extra: &searchpick::ExtraArgs|
          -> Result<
        Option<Vec<searchpick::OptionInput<String>>>,
        searchpick::ProviderError,
    > {
        *sink.borrow_mut() += 1;
        Ok(Some(vec![searchpick::OptionInput::Plain(
            query.to_string(),
        )]))
    };
    let mut widget: SearchSelect<String> = SearchSelect::new("country", WidgetConfig::new());
    let mut boundary = ScriptedBoundary::new(vec![
        BoundaryEvent::search("den"),
        BoundaryEvent::search("den"),
        BoundaryEvent::search("den"),
    ]);

    driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn min_execution_time_blocks_fast_provider() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let config = WidgetConfig::new().with_min_execution_time(Duration::from_millis(200));
    let mut widget = SearchSelect::new("country", config);
    let mut boundary = ScriptedBoundary::new(vec![BoundaryEvent::search("us")]);

    let started = Instant::now();
    driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();
    let elapsed = started.elapsed();

    assert!(
        elapsed >= Duration::from_millis(180),
        "search cycle finished in {elapsed:?}, expected the 200ms floor"
    );
}

#[test]
fn fragment_scope_negotiates_with_host_capability() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let config = WidgetConfig::new()
        .with_rerun_scope(RerunScope::Fragment)
        .with_rerun_on_update(true);
    let mut widget: SearchSelect<String> = SearchSelect::new("country", config);

    let outcome = widget
        .run_cycle(
            &mut store,
            BoundaryEvent::search("jap").into_event(),
            &mut provider,
            HostCapabilities::with_fragment_rerun(),
        )
        .unwrap();

    assert_eq!(outcome.rerun.map(|r| r.scope), Some(RerunScope::Fragment));
}

#[test]
fn csv_dataset_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(country_csv().as_bytes()).unwrap();

    let provider = FuzzySource::from_csv_path(file.path()).unwrap();
    assert_eq!(provider.len(), 4);
}

#[test]
fn two_widgets_share_a_store_without_interference() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let mut first: SearchSelect<String> = SearchSelect::new("origin", WidgetConfig::new());
    let mut second: SearchSelect<String> = SearchSelect::new("destination", WidgetConfig::new());

    let mut boundary = ScriptedBoundary::new(vec![
        BoundaryEvent::search("ger"),
        BoundaryEvent::submit_index(0),
    ]);
    driver()
        .run(&mut first, &mut store, &mut boundary, &mut provider)
        .unwrap();

    let mut boundary = ScriptedBoundary::new(vec![
        BoundaryEvent::search("jap"),
        BoundaryEvent::submit_index(0),
    ]);
    let outcome = driver()
        .run(&mut second, &mut store, &mut boundary, &mut provider)
        .unwrap();

    assert_eq!(outcome.value.as_deref(), Some("jp"));
    assert_eq!(store.len(), 2);

    // The first widget's committed value is untouched.
    let request = first.render_request(&store);
    assert_eq!(request.current, Some(serde_json::json!("de")));
}

#[test]
fn boundary_sees_stringified_cards_with_index_ids() {
    let mut store = StateStore::new();
    let mut provider = FuzzySource::from_csv(country_csv().as_bytes()).unwrap();
    let mut widget: SearchSelect<String> = SearchSelect::new("country", WidgetConfig::new());
    let mut boundary = ScriptedBoundary::new(vec![BoundaryEvent::search("denmark")]);

    driver()
        .run(&mut widget, &mut store, &mut boundary, &mut provider)
        .unwrap();

    let request = widget.render_request(&store);
    let option = &request.options[0];
    assert_eq!(option.id, "0");
    assert_eq!(option.title, "Denmark");
    assert_eq!(option.description, "Europe");
    assert_eq!(option.image, "dk.png");

    // Index ids round-trip: submitting "0" resolves to the aligned value.
    let outcome = widget
        .run_cycle(
            &mut store,
            BoundaryEvent::submit_index(0).into_event(),
            &mut provider,
            HostCapabilities::full_only(),
        )
        .unwrap();
    assert_eq!(outcome.value.as_deref(), Some("dk"));
}
