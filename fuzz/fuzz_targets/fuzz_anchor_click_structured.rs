#![no_main]

use anchorscroll_core::{
    AnchorClickHandler, CapabilityMode, CapabilitySet, HeadlessClick, HeadlessPage,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzCapability {
    Available,
    Missing,
    Throws,
}

impl From<FuzzCapability> for CapabilityMode {
    fn from(value: FuzzCapability) -> Self {
        match value {
            FuzzCapability::Available => Self::Available,
            FuzzCapability::Missing => Self::Missing,
            FuzzCapability::Throws => Self::Throws,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzScenario {
    section_ids: Vec<String>,
    section_tops: Vec<u16>,
    href: String,
    nest_depth: u8,
    initial_scroll: u16,
    reduced_motion: bool,
    match_media: FuzzCapability,
    scroll_options: FuzzCapability,
    history: FuzzCapability,
}

fuzz_target!(|scenario: FuzzScenario| {
    let mut page = HeadlessPage::new();
    for (idx, id) in scenario.section_ids.iter().take(16).enumerate() {
        let top = scenario.section_tops.get(idx).copied().unwrap_or(0);
        page.add_section(id, f64::from(top));
    }
    let link = page.add_link(&scenario.href);
    let mut target = link;
    for _ in 0..(scenario.nest_depth % 8) {
        target = page.add_element("span", Some(target), 0.0);
    }
    page.set_scroll_y(f64::from(scenario.initial_scroll));
    page.set_prefers_reduced_motion(scenario.reduced_motion);
    page.set_capabilities(CapabilitySet {
        match_media: scenario.match_media.into(),
        scroll_options: scenario.scroll_options.into(),
        history: scenario.history.into(),
    });

    let handler = AnchorClickHandler::default();
    let first = handler.handle_click(&mut page, &HeadlessClick::on(target));
    let (y1, fragment1) = (page.scroll_y(), page.fragment().to_string());

    // Post-conditions that must always hold:
    assert_eq!(first.default_prevented, first.is_scrolled());
    assert_eq!(page.defaults_prevented(), usize::from(first.is_scrolled()));
    if !first.is_scrolled() {
        assert!(page.scroll_log().is_empty(), "ignored click scrolled");
        assert!(page.history_log().is_empty(), "ignored click wrote history");
        return;
    }

    let second = handler.handle_click(&mut page, &HeadlessClick::on(target));
    assert_eq!(first, second, "repeat click diverged");
    assert_eq!(page.scroll_y(), y1);
    assert_eq!(page.fragment(), fragment1);
});
