use crate::*;

use alloc::rc::Rc;
use core::cell::RefCell;
use core::ops::RangeInclusive;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct TestSource {
    total: usize,
    // Every index resolves to this item when set.
    fill: Option<u32>,
    items: HashMap<usize, u32>,
    requests: Vec<LoadRequest>,
}

impl TestSource {
    fn loaded(total: usize) -> Self {
        Self {
            total,
            fill: Some(7),
            ..Self::default()
        }
    }

    fn sparse(total: usize, loaded: RangeInclusive<usize>) -> Self {
        let mut source = Self {
            total,
            ..Self::default()
        };
        source.load(loaded);
        source
    }

    fn load(&mut self, range: RangeInclusive<usize>) {
        for i in range {
            self.items.insert(i, i as u32);
        }
    }
}

impl DataSource for TestSource {
    type Item = u32;

    fn total_items(&self) -> usize {
        self.total
    }

    fn loaded_count(&self) -> usize {
        if self.fill.is_some() {
            self.total
        } else {
            self.items.len()
        }
    }

    fn item_at(&self, index: usize) -> Option<&u32> {
        if index >= self.total {
            return None;
        }
        self.items.get(&index).or(self.fill.as_ref())
    }

    fn load_missing_ranges(&mut self, request: LoadRequest) {
        self.requests.push(request);
    }
}

#[derive(Debug)]
struct TestElement {
    index: usize,
    size: Option<f64>,
    layout: Option<ElementLayout>,
}

impl ViewElement for TestElement {
    fn measure(&self) -> Option<f64> {
        self.size
    }

    fn place(&mut self, layout: &ElementLayout) {
        assert_eq!(layout.index, self.index);
        self.layout = Some(*layout);
    }
}

#[derive(Debug, Default)]
struct TestFactory {
    item_size: f64,
    sizes: HashMap<usize, f64>,
    detached: HashSet<usize>,
    failing: HashSet<usize>,
    markup: HashSet<usize>,
    reject_markup: bool,
    recycled: Rc<RefCell<Vec<usize>>>,
}

impl TestFactory {
    fn new(item_size: f64) -> Self {
        Self {
            item_size,
            ..Self::default()
        }
    }

    fn element(&self, index: usize) -> TestElement {
        let size = if self.detached.contains(&index) {
            None
        } else {
            Some(self.sizes.get(&index).copied().unwrap_or(self.item_size))
        };
        TestElement {
            index,
            size,
            layout: None,
        }
    }
}

impl ElementFactory<u32> for TestFactory {
    type Element = TestElement;

    fn render(&mut self, item: &u32, index: usize) -> Result<Rendered<TestElement>, TemplateError> {
        if self.failing.contains(&index) {
            return Err(TemplateError::failed(index, "template panicked"));
        }
        if self.markup.contains(&index) {
            return Ok(Rendered::Markup(format!("<li>{item}</li>")));
        }
        Ok(Rendered::Element(self.element(index)))
    }

    fn from_markup(&mut self, markup: String, index: usize) -> Result<TestElement, TemplateError> {
        if self.reject_markup {
            return Err(TemplateError::MarkupUnsupported { index });
        }
        assert!(markup.starts_with("<li>"));
        Ok(self.element(index))
    }

    fn recycle(&mut self, index: usize, element: TestElement) {
        assert_eq!(element.index, index);
        self.recycled.borrow_mut().push(index);
    }
}

type Manager = WindowManager<TestSource, TestFactory>;

fn manager(source: TestSource, viewport: f64, estimate: f64, overscan: usize) -> Manager {
    WindowManager::new(
        source,
        TestFactory::new(estimate),
        WindowOptions::new(viewport, estimate).with_overscan(overscan),
    )
}

fn rebuilt(created: usize, recycled: usize, failed: usize, requested: usize) -> RenderOutcome {
    RenderOutcome::Rebuilt(RebuildStats {
        created,
        recycled,
        failed,
        requested,
    })
}

fn assert_gapless(m: &Manager) {
    let indices = m.rendered_indices();
    for pair in indices.windows(2) {
        let a = m.layout(pair[0]).unwrap();
        let b = m.layout(pair[1]).unwrap();
        if pair[1] == pair[0] + 1 {
            assert!(
                (b.offset - a.end()).abs() < 1e-6,
                "gap between {} and {}: {} vs {}",
                pair[0],
                pair[1],
                a.end(),
                b.offset
            );
        } else {
            assert!(b.offset > a.end());
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 11
    }

    fn gen_f64(&mut self, max: f64) -> f64 {
        self.next_u64() as f64 / (1u64 << 53) as f64 * max
    }
}

#[test]
fn first_render_creates_viewport_plus_overscan() {
    let mut m = manager(TestSource::loaded(1000), 300.0, 30.0, 2);
    assert_eq!(
        m.take_events(),
        vec![EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
            previous: 0.0,
            current: 30_000.0,
            compressed: false,
        })]
    );

    assert_eq!(m.render(), rebuilt(12, 0, 0, 0));
    assert_eq!(m.rendered_indices(), (0..=11).collect::<Vec<_>>());
    assert_eq!(m.last_range(), Some(IndexRange::new(0, 11)));

    let l5 = m.layout(5).unwrap();
    assert_eq!(l5.offset, 150.0);
    assert_eq!(l5.size, 30.0);
    assert!(!l5.measured);
    assert!(m.layout(9).unwrap().visible);
    assert!(!m.layout(10).unwrap().visible);
    assert_eq!(m.element(5).unwrap().layout, Some(l5));
}

#[test]
fn unchanged_range_only_repositions() {
    let mut m = manager(TestSource::loaded(1000), 300.0, 30.0, 2);
    m.render();

    assert_eq!(m.render(), RenderOutcome::Repositioned { placed: 12 });
    assert_eq!(m.on_scroll(15.0), RenderOutcome::Repositioned { placed: 12 });

    // Items 6 and 7 are just outside the new range but within its overscan margin.
    assert_eq!(m.on_scroll(300.0), rebuilt(10, 6, 0, 0));
    assert_eq!(m.rendered_indices(), (6..=21).collect::<Vec<_>>());
    assert_eq!(*m.factory().recycled.borrow(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(m.layout(8).unwrap().offset, 240.0);
    assert_gapless(&m);
}

#[test]
fn random_scrolling_keeps_window_complete_and_bounded() {
    let mut m = manager(TestSource::loaded(100_000), 500.0, 25.0, 3);
    let max = m.mapper().max_scroll_position();
    let mut rng = Lcg(0x5eed);

    for step in 0..300u64 {
        let scroll = if step % 50 == 0 { max } else { rng.gen_f64(max) };
        m.on_scroll(scroll);
        m.tick(step * 16);

        let range = m.last_range().unwrap();
        let keep = range.expand(3, 99_999);
        let rendered = m.rendered_indices();
        assert!(range.iter().all(|i| rendered.contains(&i)));
        assert!(rendered.iter().all(|&i| keep.contains(i)));

        let viewport = m.mapper().viewport_range(m.scroll_position()).unwrap();
        for &i in &rendered {
            assert_eq!(m.layout(i).unwrap().visible, viewport.contains(i));
        }
        assert_gapless(&m);
    }
    assert_eq!(m.size_cache().estimate(), 25.0);
}

#[test]
fn unloaded_items_are_requested_not_rendered() {
    let mut m = manager(TestSource::sparse(100, 0..=4), 100.0, 10.0, 0);

    assert_eq!(m.render(), rebuilt(5, 0, 0, 1));
    assert_eq!(m.rendered_indices(), vec![0, 1, 2, 3, 4]);
    assert_eq!(
        m.source().requests,
        vec![LoadRequest {
            id: LoadId(1),
            range: IndexRange::new(5, 9),
            priority: LoadPriority::High,
        }]
    );
    assert_eq!(m.loads_in_flight(), 1);

    // Same range, already in flight: no duplicate request.
    assert_eq!(m.render(), rebuilt(0, 0, 0, 0));
    assert_eq!(m.source().requests.len(), 1);

    m.source_mut().load(5..=9);
    assert_eq!(m.complete_load(LoadId(1), Ok(())), rebuilt(5, 0, 0, 0));
    assert_eq!(m.rendered_indices(), (0..=9).collect::<Vec<_>>());
    assert_eq!(m.loads_in_flight(), 0);
}

#[test]
fn prefetch_requests_margins_at_low_priority() {
    let options = WindowOptions::new(100.0, 10.0)
        .with_overscan(0)
        .with_prefetch(5);
    let mut m = WindowManager::new(
        TestSource::sparse(1000, 0..=19),
        TestFactory::new(10.0),
        options,
    );

    assert_eq!(m.render(), rebuilt(10, 0, 0, 0));
    assert!(m.source().requests.is_empty());

    assert_eq!(m.on_scroll(150.0), rebuilt(5, 10, 0, 2));
    let requests = &m.source().requests;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].range, IndexRange::new(20, 24));
    assert_eq!(requests[0].priority, LoadPriority::High);
    assert_eq!(requests[1].range, IndexRange::new(25, 29));
    assert_eq!(requests[1].priority, LoadPriority::Low);
}

#[test]
fn loads_complete_in_any_order() {
    let options = WindowOptions::new(100.0, 10.0)
        .with_overscan(0)
        .with_prefetch(5);
    let mut m = WindowManager::new(
        TestSource::sparse(1000, 0..=19),
        TestFactory::new(10.0),
        options,
    );
    m.on_scroll(150.0);
    let high = m.source().requests[0].id;
    let low = m.source().requests[1].id;

    // The prefetch resolves first; the visible range is still in flight.
    m.source_mut().load(25..=29);
    assert_eq!(m.complete_load(low, Ok(())), rebuilt(0, 0, 0, 0));
    assert_eq!(m.rendered_indices(), (15..=19).collect::<Vec<_>>());
    assert_eq!(m.source().requests.len(), 2);

    m.source_mut().load(20..=24);
    assert_eq!(m.complete_load(high, Ok(())), rebuilt(5, 0, 0, 0));
    assert_eq!(m.rendered_indices(), (15..=24).collect::<Vec<_>>());

    assert_eq!(
        m.complete_load(high, Ok(())),
        RenderOutcome::Skipped(SkipReason::Idle)
    );
}

#[test]
fn failed_load_is_reported_and_requested_again() {
    let mut m = manager(TestSource::sparse(100, 0..=4), 100.0, 10.0, 0);
    m.render();
    m.take_events();

    let error = LoadError::Failed("timeout".into());
    assert_eq!(
        m.complete_load(LoadId(1), Err(error.clone())),
        RenderOutcome::Skipped(SkipReason::Idle)
    );
    assert_eq!(
        m.take_events(),
        vec![EngineEvent::LoadFailed {
            id: LoadId(1),
            range: IndexRange::new(5, 9),
            error,
        }]
    );
    assert_eq!(m.loads_in_flight(), 0);

    assert_eq!(m.render(), rebuilt(0, 0, 0, 1));
    assert_eq!(m.source().requests[1].id, LoadId(2));
    assert_eq!(m.source().requests[1].range, IndexRange::new(5, 9));
}

#[test]
fn failed_template_is_skipped_and_retried() {
    let mut m = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    m.factory_mut().failing.insert(3);

    assert_eq!(m.render(), rebuilt(9, 0, 1, 0));
    assert!(m.element(3).is_none());
    // The missing item still takes its estimated space.
    assert_eq!(m.layout(4).unwrap().offset, 40.0);

    m.factory_mut().failing.clear();
    assert_eq!(m.render(), rebuilt(1, 0, 0, 0));
    assert_eq!(m.layout(3).unwrap().offset, 30.0);
    assert_gapless(&m);
}

#[test]
fn markup_is_materialized_through_factory() {
    let mut m = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    m.factory_mut().markup.insert(2);
    assert_eq!(m.render(), rebuilt(10, 0, 0, 0));
    assert!(m.element(2).is_some());

    let mut m = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    m.factory_mut().markup.insert(2);
    m.factory_mut().reject_markup = true;
    assert_eq!(m.render(), rebuilt(9, 0, 1, 0));
    assert!(m.element(2).is_none());
}

#[test]
fn tick_measures_new_elements_and_closes_gaps() {
    let mut m = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    m.factory_mut().item_size = 20.0;
    m.render();
    assert_eq!(m.layout(1).unwrap().offset, 10.0);
    assert!(!m.layout(1).unwrap().measured);

    // Measured, but the estimate is still inside its debounce window.
    assert_eq!(m.tick(0), RenderOutcome::Repositioned { placed: 10 });
    let l1 = m.layout(1).unwrap();
    assert_eq!(l1.offset, 20.0);
    assert_eq!(l1.size, 20.0);
    assert!(l1.measured);
    assert_gapless(&m);
    assert_eq!(m.size_cache().estimate(), 10.0);

    // Debounce elapsed: the estimate doubles, so half as many items fit.
    assert_eq!(m.tick(16), rebuilt(0, 5, 0, 0));
    assert_eq!(m.size_cache().estimate(), 20.0);
    assert_eq!(m.rendered_indices(), vec![0, 1, 2, 3, 4]);
    assert_eq!(*m.factory().recycled.borrow(), vec![5, 6, 7, 8, 9]);
    assert_eq!(
        m.take_events(),
        vec![
            EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
                previous: 0.0,
                current: 1000.0,
                compressed: false,
            }),
            EngineEvent::EstimateChanged(EstimateChanged {
                previous: 10.0,
                current: 20.0,
            }),
            EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
                previous: 1000.0,
                current: 2000.0,
                compressed: false,
            }),
        ]
    );

    assert_eq!(m.tick(100), RenderOutcome::Skipped(SkipReason::Idle));
}

#[test]
fn detached_element_keeps_estimate() {
    let mut m = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    m.factory_mut().detached.insert(0);
    m.render();

    assert_eq!(m.tick(0), RenderOutcome::Repositioned { placed: 10 });
    assert!(!m.size_cache().has(0));
    assert!(!m.layout(0).unwrap().measured);
    assert!(m.layout(1).unwrap().measured);
    assert_eq!(m.size_cache().len(), 9);
}

#[test]
fn render_waits_for_first_data() {
    let source = TestSource {
        total: 50,
        ..TestSource::default()
    };
    let mut m = manager(source, 100.0, 10.0, 0);
    assert_eq!(m.render(), RenderOutcome::Skipped(SkipReason::AwaitingData));
    assert!(m.source().requests.is_empty());
    assert_eq!(m.rendered_count(), 0);

    m.source_mut().load(0..=9);
    assert_eq!(m.render(), rebuilt(10, 0, 0, 0));
}

#[test]
fn empty_collection_and_zero_viewport_render_nothing() {
    let mut m = manager(TestSource::loaded(0), 100.0, 10.0, 0);
    assert_eq!(m.render(), rebuilt(0, 0, 0, 0));
    assert_eq!(m.last_range(), None);
    assert!(m.take_events().is_empty());

    let mut m = manager(TestSource::loaded(100), 0.0, 10.0, 0);
    assert_eq!(m.render(), rebuilt(0, 0, 0, 0));
    assert_eq!(m.rendered_count(), 0);
    assert_eq!(m.on_viewport_size(100.0), rebuilt(10, 0, 0, 0));
}

#[test]
fn shrinking_collection_clamps_scroll() {
    let mut m = manager(TestSource::loaded(1000), 100.0, 10.0, 0);
    m.on_scroll(5000.0);
    assert_eq!(m.last_range(), Some(IndexRange::new(500, 509)));
    m.take_events();

    m.source_mut().total = 100;
    assert_eq!(m.render(), rebuilt(10, 10, 0, 0));
    assert_eq!(m.scroll_position(), 900.0);
    assert_eq!(m.rendered_indices(), (90..=99).collect::<Vec<_>>());
    assert_eq!(
        m.take_events(),
        vec![EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
            previous: 10_000.0,
            current: 1000.0,
            compressed: false,
        })]
    );

    m.set_total_items(0);
    m.source_mut().total = 0;
    assert_eq!(m.render(), rebuilt(0, 10, 0, 0));
    assert_eq!(m.scroll_position(), 0.0);
}

#[test]
fn max_scroll_reveals_last_item_when_compressed() {
    let mut m = manager(TestSource::loaded(2_000_000), 600.0, 30.0, 2);
    assert!(m.mapper().is_compressed());
    m.render();

    let max = m.mapper().max_scroll_position();
    assert_eq!(m.on_scroll(max), rebuilt(22, 22, 0, 0));
    assert_eq!(m.last_range(), Some(IndexRange::new(1_999_978, 1_999_999)));

    let last = m.layout(1_999_999).unwrap();
    assert!(last.visible);
    assert!((last.end() - 10_000_000.0).abs() < 1e-6);
    assert_gapless(&m);

    // Overscrolling is clamped to the same place.
    assert_eq!(
        m.on_scroll(max + 1_000.0),
        RenderOutcome::Repositioned { placed: 22 }
    );
}

#[test]
fn compressed_tail_keeps_viewport_covered() {
    let mut m = manager(TestSource::loaded(5_000_000), 800.0, 40.0, 1);
    m.render();
    let max = m.mapper().max_scroll_position();
    let from = max - 1.5 * 800.0;
    let mut rng = Lcg(0x7a11);
    let mut scrolls: Vec<f64> = (0..=150)
        .map(|i| from + (max - from) * i as f64 / 150.0)
        .collect();
    scrolls.extend((0..150).map(|_| from + rng.gen_f64(max - from)));
    scrolls.sort_by(f64::total_cmp);

    let mut previous: Vec<(usize, f64)> = Vec::new();
    for (step, scroll) in scrolls.into_iter().enumerate() {
        m.on_scroll(scroll);
        m.tick(step as u64 * 16);
        let scroll = m.scroll_position();

        let rendered = m.rendered_indices();
        let first = m.layout(rendered[0]).unwrap();
        let last = m.layout(*rendered.last().unwrap()).unwrap();
        assert!(
            first.offset <= scroll + 1e-6,
            "top of viewport uncovered at {scroll}: first item at {}",
            first.offset
        );
        assert!(
            last.end() >= scroll + 800.0 - 1e-6,
            "bottom of viewport uncovered at {scroll}: last item ends at {}",
            last.end()
        );
        assert_gapless(&m);

        // Items rendered before and after the step only move up relative to the viewport.
        for &(index, offset) in &previous {
            if let Some(layout) = m.layout(index) {
                assert!(
                    layout.offset - scroll <= offset + 1e-6,
                    "item {index} moved down at {scroll}"
                );
            }
        }
        previous = rendered
            .iter()
            .map(|&i| (i, m.layout(i).unwrap().offset - scroll))
            .collect();
    }

    m.on_scroll(max);
    let last = m.layout(4_999_999).unwrap();
    assert!((last.end() - 10_000_000.0).abs() < 1e-6);
    assert_eq!(m.size_cache().estimate(), 40.0);
}

#[test]
fn announced_count_wins_until_source_reports_a_new_one() {
    let mut m = manager(TestSource::loaded(1000), 100.0, 10.0, 0);
    m.render();
    m.take_events();

    m.set_total_items(2000);
    assert_eq!(
        m.take_events(),
        vec![EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
            previous: 10_000.0,
            current: 20_000.0,
            compressed: false,
        })]
    );

    // The source still reports 1000: the new indices are requested, not reverted.
    assert_eq!(m.on_scroll(15_000.0), rebuilt(0, 10, 0, 1));
    assert_eq!(m.mapper().total_items(), 2000);
    assert_eq!(m.scroll_position(), 15_000.0);
    assert_eq!(m.source().requests[0].range, IndexRange::new(1500, 1509));

    m.source_mut().total = 2000;
    assert_eq!(m.render(), rebuilt(10, 0, 0, 0));
    assert_eq!(m.rendered_indices(), (1500..=1509).collect::<Vec<_>>());
    assert!(m.take_events().is_empty());
}

#[test]
fn scroll_to_index_aligns_item() {
    let mut m = manager(TestSource::loaded(1000), 100.0, 10.0, 0);

    m.scroll_to_index(500, Align::Start);
    assert_eq!(m.scroll_position(), 5000.0);
    assert_eq!(m.last_range(), Some(IndexRange::new(500, 509)));

    m.scroll_to_index(500, Align::End);
    assert_eq!(m.scroll_position(), 4910.0);
    assert_eq!(m.last_range(), Some(IndexRange::new(491, 500)));

    m.scroll_to_index(495, Align::Auto);
    assert_eq!(m.scroll_position(), 4910.0);
}

#[test]
fn reset_cache_returns_to_default_estimate() {
    let mut m = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    m.factory_mut().item_size = 20.0;
    m.render();
    m.tick(0);
    m.tick(16);
    assert_eq!(m.size_cache().estimate(), 20.0);
    m.take_events();

    m.reset_cache();
    assert_eq!(m.size_cache().estimate(), 10.0);
    assert!(m.size_cache().is_empty());
    assert_eq!(
        m.take_events(),
        vec![EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
            previous: 2000.0,
            current: 1000.0,
            compressed: false,
        })]
    );

    // Live elements are measured again on the next pass.
    assert_eq!(m.render(), rebuilt(5, 0, 0, 0));
    assert_eq!(m.size_cache().len(), 5);
}

#[test]
fn measurements_carry_over_to_a_new_window() {
    let mut a = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    a.factory_mut().item_size = 20.0;
    a.render();
    a.tick(0);
    a.tick(16);
    let snapshot = a.export_measurements();
    assert_eq!(snapshot.estimate, 20.0);
    assert_eq!(snapshot.entries.len(), 10);

    let mut b = manager(TestSource::loaded(100), 100.0, 10.0, 0);
    b.take_events();
    assert_eq!(b.import_measurements(snapshot), 10);
    assert_eq!(b.size_cache().estimate(), 20.0);
    assert_eq!(b.mapper().space().virtual_total_size, 2000.0);
    assert_eq!(
        b.take_events(),
        vec![
            EngineEvent::EstimateChanged(EstimateChanged {
                previous: 10.0,
                current: 20.0,
            }),
            EngineEvent::VirtualSizeChanged(VirtualSizeChanged {
                previous: 1000.0,
                current: 2000.0,
                compressed: false,
            }),
        ]
    );
    assert_eq!(b.render(), rebuilt(5, 0, 0, 0));
    assert_eq!(b.layout(3).unwrap().offset, 60.0);
}

#[test]
fn scroll_snapshot_restores_position() {
    let mut m = manager(TestSource::loaded(1000), 100.0, 10.0, 0);
    m.on_scroll(1234.0);
    let snapshot = m.scroll_snapshot();
    assert_eq!(snapshot.anchor_index, 123);

    m.on_scroll(0.0);
    m.restore_scroll(&snapshot);
    assert_eq!(m.scroll_position(), 1234.0);
}

#[test]
fn destroy_recycles_everything_once() {
    let mut m = manager(TestSource::loaded(1000), 300.0, 30.0, 2);
    m.render();
    let recycled = Rc::clone(&m.factory().recycled);

    m.destroy();
    assert!(m.is_destroyed());
    assert_eq!(recycled.borrow().len(), 12);
    assert_eq!(m.rendered_count(), 0);

    assert_eq!(m.render(), RenderOutcome::Skipped(SkipReason::Destroyed));
    assert_eq!(m.on_scroll(600.0), RenderOutcome::Skipped(SkipReason::Destroyed));
    assert_eq!(m.tick(16), RenderOutcome::Skipped(SkipReason::Destroyed));
    m.destroy();
    drop(m);
    assert_eq!(recycled.borrow().len(), 12);
}

#[test]
fn drop_recycles_live_elements() {
    let mut m = manager(TestSource::loaded(1000), 300.0, 30.0, 0);
    m.render();
    let recycled = Rc::clone(&m.factory().recycled);
    drop(m);
    assert_eq!(*recycled.borrow(), (0..=9).collect::<Vec<_>>());
}
