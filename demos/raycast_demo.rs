use bump2d::{Rect, World};

fn main() {
    let mut world: World<u32> = World::new(1.0).unwrap();
    world.add(10, Rect::new(2.0, -0.5, 1.0, 1.0)).unwrap();
    world.add(20, Rect::new(4.0, -0.5, 1.0, 1.0)).unwrap();

    let hits = world.query_segment_with_coords(0.0, 0.0, 100.0, 0.0, None);
    match hits.first() {
        Some(hit) => println!(
            "Ray hit item={:?} ti1={:.3} entry=({:.2},{:.2})",
            hit.item, hit.ti1, hit.entry.0, hit.entry.1
        ),
        None => println!("No hit"),
    }
}
