// Example: drive a WindowManager the way a UI adapter would.
//
// The "host" here is a vector of fake rows whose height depends on the text length, and
// a data source that loads pages when asked.
use std::collections::HashMap;

use hugelist_window::{
    DataSource, ElementFactory, ElementLayout, EngineEvent, LoadRequest, Rendered,
    TemplateError, ViewElement, WindowManager, WindowOptions,
};

struct PagedSource {
    total: usize,
    rows: HashMap<usize, String>,
    queued: Vec<LoadRequest>,
}

impl PagedSource {
    fn fulfil(&mut self, request: &LoadRequest) {
        for i in request.range.iter() {
            self.rows.insert(i, format!("row {i}: {}", "lorem ".repeat(i % 7)));
        }
    }
}

impl DataSource for PagedSource {
    type Item = String;

    fn total_items(&self) -> usize {
        self.total
    }

    fn loaded_count(&self) -> usize {
        self.rows.len()
    }

    fn item_at(&self, index: usize) -> Option<&String> {
        self.rows.get(&index)
    }

    fn load_missing_ranges(&mut self, request: LoadRequest) {
        self.queued.push(request);
    }
}

struct Row {
    height: f64,
    top: f64,
}

impl ViewElement for Row {
    fn measure(&self) -> Option<f64> {
        Some(self.height)
    }

    fn place(&mut self, layout: &ElementLayout) {
        self.top = layout.offset;
    }
}

struct RowFactory;

impl ElementFactory<String> for RowFactory {
    type Element = Row;

    fn render(&mut self, item: &String, _index: usize) -> Result<Rendered<Row>, TemplateError> {
        let lines = 1 + item.len() / 20;
        Ok(Rendered::Element(Row {
            height: 18.0 * lines as f64,
            top: 0.0,
        }))
    }
}

fn main() {
    let mut source = PagedSource {
        total: 1_000_000,
        rows: HashMap::new(),
        queued: Vec::new(),
    };
    // The first page is fetched up front.
    source.fulfil(&LoadRequest {
        id: hugelist_window::LoadId(0),
        range: hugelist_window::IndexRange::new(0, 49),
        priority: hugelist_window::LoadPriority::High,
    });

    let options = WindowOptions::new(600.0, 40.0)
        .with_overscan(3)
        .with_prefetch(20);
    let mut window = WindowManager::new(source, RowFactory, options);

    let mut now_ms = 0u64;
    for scroll in [0.0, 400.0, 12_000.0, 5_000_000.0] {
        println!("scroll to {scroll}: {:?}", window.on_scroll(scroll));

        // Resolve whatever the window asked for, as a network layer would.
        let requests: Vec<LoadRequest> = window.source_mut().queued.drain(..).collect();
        for request in &requests {
            window.source_mut().fulfil(request);
            window.complete_load(request.id, Ok(()));
        }

        // Next frames: measure and settle the estimate.
        for _ in 0..3 {
            now_ms += 16;
            window.tick(now_ms);
        }

        let rendered = window.rendered_indices();
        println!(
            "  rendered {}..={} ({} rows), first top={:?}, estimate={:.1}",
            rendered.first().copied().unwrap_or_default(),
            rendered.last().copied().unwrap_or_default(),
            rendered.len(),
            rendered.first().and_then(|&i| window.element(i)).map(|r| r.top),
            window.size_cache().estimate()
        );
        for event in window.take_events() {
            if let EngineEvent::VirtualSizeChanged(changed) = event {
                println!("  scrollbar extent -> {}", changed.current);
            }
        }
    }

    window.destroy();
}
