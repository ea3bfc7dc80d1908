// Example: a 5M item list squeezed into a 10M pixel scroll surface.
use hugelist::{Align, CoordinateMapper, MapperOptions};

fn main() {
    let mut mapper = CoordinateMapper::new(MapperOptions::new(800.0).with_overscan(2), 60.0);
    if let Some(changed) = mapper.update_total_virtual_size(5_000_000) {
        println!("virtual size {} -> {}", changed.previous, changed.current);
    }

    let space = mapper.space();
    println!(
        "actual={} virtual={} ratio={:.4} compressed={}",
        space.actual_total_size,
        space.virtual_total_size,
        space.compression_ratio,
        space.is_compressed()
    );

    let max = mapper.max_scroll_position();
    for scroll in [0.0, max / 2.0, max - 800.0, max - 400.0, max] {
        let range = mapper.visible_range(scroll);
        let origin = range.map(|r| mapper.window_origin(r.start, scroll));
        println!("scroll={scroll:>12.1} range={range:?} origin={origin:?}");
    }

    // Jump to an item and back.
    let target = mapper.scroll_position_for_index(2_500_000, Align::Center, 0.0);
    println!(
        "center item 2500000 at scroll={target} -> index_for_position={}",
        mapper.index_for_position(target)
    );
}
