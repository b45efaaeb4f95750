use flat_collide::{
    GridConfig, Polygon, Rectf, Shape, ShapeGrid, ShapeGridHandle, ShapeKind, Vector,
};

#[derive(Clone)]
struct Body {
    velocity: Vector,
    spin: f32,
}

fn init_logging() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();
}

fn main() {
    init_logging();

    let mut g: ShapeGrid<Body> = ShapeGrid::from_config(&GridConfig::default()).unwrap();

    // crates and rocks in the range x: [-200..200], y: [-200..200], heading to the center
    for i in 0..100 {
        let pos = Vector::new(
            400.0 * rand::random::<f32>() - 200.0,
            400.0 * rand::random::<f32>() - 200.0,
        );
        let body = Body {
            velocity: -pos / pos.length().max(1.0),
            spin: if i % 2 == 0 { 0.0 } else { 0.05 },
        };
        let shape: ShapeKind = if body.spin == 0.0 {
            Rectf::from_corners(pos, pos + Vector::new(8.0, 8.0)).into()
        } else {
            let hexagon = (0..6)
                .map(|k| {
                    let a = k as f32 * std::f32::consts::TAU / 6.0;
                    Vector::new(a.cos(), a.sin()) * 5.0
                })
                .collect();
            Polygon::with_transform(hexagon, pos, 0.0).into()
        };
        g.insert(shape, body);
    }

    for step in 0..200 {
        update_loop(&mut g);
        if step % 20 == 0 {
            log::info!("step {}: {} cells in use", step, g.storage().cells().len());
        }
    }
}

fn update_loop(g: &mut ShapeGrid<Body>) {
    let handles: Vec<ShapeGridHandle> = g.handles().collect();

    // Move
    for &h in &handles {
        let (shape, body) = g.get(h).unwrap();
        let body = body.clone();
        if body.spin != 0.0 {
            if let ShapeKind::Polygon(p) = shape {
                let mut p = p.clone();
                p.add_rotation(body.spin);
                g.set_shape(h, p);
            }
        }
        g.translate(h, body.velocity);
    }

    // Push colliding shapes apart, the first one of each pair gives way
    let pairs = g.colliding_pairs();
    if !pairs.is_empty() {
        log::info!("{} collisions", pairs.len());
    }
    for (a, b) in pairs {
        let push = {
            let (sa, _) = g.get(a).unwrap();
            let (sb, _) = g.get(b).unwrap();
            sa.penetration_vector(sb.as_shape())
        };
        g.translate(a, push);
        if let Some((_, body)) = g.get_mut(a) {
            body.velocity = Vector::zero();
        }
    }
}
