use std::sync::Arc;

use shared_ref::{make_shared, SharedRef};

trait Shape: Send + Sync {
    fn name(&self) -> &'static str;
    fn area(&self) -> f64;
}

struct Circle(f64);

impl Shape for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn area(&self) -> f64 {
        std::f64::consts::PI * self.0 * self.0
    }
}

struct Rect(f64, f64);

impl Shape for Rect {
    fn name(&self) -> &'static str {
        "rect"
    }

    fn area(&self) -> f64 {
        self.0 * self.1
    }
}

fn total_area(shapes: &[SharedRef<dyn Shape>]) -> f64 {
    shapes.iter().map(|shape| shape.area()).sum()
}

pub fn main() {
    let circle = make_shared(Circle(1.0));

    let shapes: Vec<SharedRef<dyn Shape>> = vec![
        circle.clone().convert(|arc| arc as Arc<dyn Shape>),
        make_shared(Rect(2.0, 3.0)).convert(|arc| arc as Arc<dyn Shape>),
    ];

    for shape in &shapes {
        println!("{}: {:.2} ({} owners)", shape.name(), shape.area(), shape.use_count());
    }
    println!("total: {:.2}", total_area(&shapes));
}
