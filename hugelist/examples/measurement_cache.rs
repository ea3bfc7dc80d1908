// Example: measured sizes converge the estimate, and survive a round trip through a snapshot.
use hugelist::{ItemSizeCache, SizeCacheOptions};

fn main() {
    let mut cache = ItemSizeCache::new(SizeCacheOptions::new(60.0).with_capacity(1000));

    // A burst of measurements within one debounce window.
    for (i, size) in [48.0, 52.0, 50.0, 49.0, 51.0].into_iter().enumerate() {
        cache.record(i, size, 0).ok();
    }
    println!("estimate before debounce: {}", cache.estimate());
    println!("poll at 5ms: {:?}", cache.poll_estimate(5));
    println!("poll at 16ms: {:?}", cache.poll_estimate(16));

    if let Err(err) = cache.record(9, 0.0, 20) {
        println!("rejected: {err}");
    }

    let snapshot = cache.export_measurements();
    println!("exported {} entries", snapshot.entries.len());

    let mut restored = ItemSizeCache::default();
    let accepted = restored.import_measurements(snapshot);
    println!(
        "imported {accepted}: estimate={} size(2)={} size(100)={}",
        restored.estimate(),
        restored.get(2),
        restored.get(100)
    );
    println!("total size of 1000 items: {}", restored.total_size(Some(1000)));
}
