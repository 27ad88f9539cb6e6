use bump2d::{Rect, World};

fn main() {
    let mut world: World<u32> = World::new(1.0).unwrap();
    let ball = 1;
    let wall = 2;
    world.add(ball, Rect::new(-3.0, 0.0, 1.0, 1.0)).unwrap();
    world.add(wall, Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();

    let bounce_off_walls = |_mover: Option<u32>, _other: u32| Some("bounce".to_string());

    let (x, y, collisions) = world.move_item(ball, 5.0, 0.0, Some(&bounce_off_walls)).unwrap();
    println!("ball resolved to ({x:.3}, {y:.3})");
    for col in &collisions {
        println!(
            "hit {:?} at ti={:.3} normal={:?} touch=({:.2},{:.2}) kind={}",
            col.other, col.ti, col.normal, col.touch.0, col.touch.1, col.kind
        );
    }
}
