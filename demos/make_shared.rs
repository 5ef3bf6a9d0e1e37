use shared_ref::{make_shared, SharedRef};

pub fn main() {
    let h = make_shared(42);
    println!("value {} owners {} unique {}", *h, h.use_count(), h.unique());

    let alias = h.clone();
    println!("after clone: owners {}", alias.use_count());

    let maybe = Some(std::sync::Arc::new(7));
    let from_cell = SharedRef::from_cell(&maybe);
    println!("from cell: {} owners {}", from_cell, from_cell.use_count());

    let mut a = make_shared("first");
    let mut b = make_shared("second");
    a.swap(&mut b);
    println!("swapped: a = {}, b = {}", a, b);
}
