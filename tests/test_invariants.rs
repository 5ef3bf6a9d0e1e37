use std::{
    any::Any,
    cell::Cell,
    fmt::Debug,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
    sync::Arc,
};

use shared_ref::{make_shared, SharedRef};

trait Shape: Debug + Send + Sync {
    fn area(&self) -> f64;
}

#[derive(Debug)]
struct Square(f64);

impl Shape for Square {
    fn area(&self) -> f64 {
        self.0 * self.0
    }
}

struct DropFlag(Rc<Cell<usize>>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_default()
}

#[test]
fn test_make_shared_scenario() {
    let h = make_shared(42);

    assert_eq!(*h, 42);
    assert_eq!(h.use_count(), 1);
    assert!(h.unique());
}

#[test]
fn test_raw_pointer_scenario() {
    let h = unsafe { SharedRef::from_raw(Box::into_raw(Box::new(7))) };
    assert_eq!(*h, 7);
    assert!(h.use_count() >= 1);

    let result = panic::catch_unwind(|| unsafe { SharedRef::from_raw(std::ptr::null_mut::<i32>()) });
    let message = panic_message(result.map(|_| ()).unwrap_err());
    assert!(message.contains("pointer cannot be null"), "{}", message);
}

#[test]
fn test_copy_increments_by_one() {
    let a = make_shared(String::from("a"));
    let before = a.use_count();

    let mut b = make_shared(String::from("b"));
    b.clone_from(&a);

    assert!(SharedRef::ptr_eq(&a, &b));
    assert_eq!(a.use_count(), before + 1);
    assert_eq!(a.use_count(), b.use_count());
}

#[test]
fn test_exchange_law() {
    let mut a = make_shared(1);
    let mut b = make_shared(2);

    std::mem::swap(&mut a, &mut b);
    assert_eq!((*a, *b), (2, 1));
    assert!(a.use_count() >= 1);
    assert!(b.use_count() >= 1);

    a.swap(&mut b);
    assert_eq!((*a, *b), (1, 2));
    assert!(a.use_count() >= 1);
    assert!(b.use_count() >= 1);
}

#[test]
fn test_aliasing_outlives_original() {
    let drops = Rc::new(Cell::new(0));
    let a = SharedRef::new(DropFlag(drops.clone()));
    let b = a.clone();

    drop(a);
    assert_eq!(b.use_count(), 1);
    assert_eq!(drops.get(), 0);
    assert_eq!(b.0.get(), 0);

    drop(b);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_raw_cell_keeps_value_alive() {
    let drops = Rc::new(Cell::new(0));
    let h = SharedRef::new(DropFlag(drops.clone()));
    let cell: Arc<DropFlag> = SharedRef::as_arc(&h).clone();

    drop(h);
    assert_eq!(drops.get(), 0);

    drop(cell);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_conversion_to_trait_object() {
    let square = make_shared(Square(3.0));
    let shape: SharedRef<dyn Shape> = square.clone().convert(|arc| arc as Arc<dyn Shape>);

    assert_eq!(shape.area(), 9.0);
    assert_eq!(shape.use_count(), 2);
    assert_eq!(square.use_count(), shape.use_count());
}

#[test]
fn test_related_cell_is_validated() {
    let cell: Option<Arc<dyn Shape>> = Some(Arc::new(Square(2.0)));
    let shape = SharedRef::from_cell(&cell);
    assert_eq!(shape.area(), 4.0);

    let empty: Option<Arc<dyn Shape>> = None;
    assert!(panic::catch_unwind(AssertUnwindSafe(|| SharedRef::from_cell(&empty))).is_err());
}

#[test]
fn test_assign_from_related_cell() {
    let mut shape: SharedRef<dyn Shape> =
        make_shared(Square(1.0)).convert(|arc| arc as Arc<dyn Shape>);
    let square = Arc::new(Square(4.0));

    shape.assign(Some(square.clone() as Arc<dyn Shape>));
    assert_eq!(shape.area(), 16.0);
    assert_eq!(shape.use_count(), 2);
    assert_eq!(Arc::strong_count(&square), 2);

    let empty: Option<Arc<dyn Shape>> = None;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        shape.assign_from(&empty);
    }));
    assert!(result.is_err());
    assert_eq!(shape.area(), 16.0);
}

#[test]
fn test_failed_assign_leaves_handle_intact() {
    let mut h = make_shared(5);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        h.assign(None);
    }));

    assert!(result.is_err());
    assert_eq!(*h, 5);
    assert!(h.unique());
}

#[test]
fn test_failed_assign_from_leaves_handle_intact() {
    let mut h = make_shared(1);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        h.assign_from(&None);
    }));

    assert!(result.is_err());
    assert_eq!(*h, 1);
    assert!(h.unique());
}

#[test]
fn test_from_option_empty_halts() {
    let result = panic::catch_unwind(|| SharedRef::from_option(None::<Arc<u8>>));
    let message = panic_message(result.map(|_| ()).unwrap_err());

    assert!(message.contains("shared cell: pointer cannot be null"), "{}", message);
}

#[test]
fn test_failed_take_leaves_source_alone() {
    let mut cell: Option<Arc<u8>> = None;

    let result = panic::catch_unwind(AssertUnwindSafe(|| SharedRef::take_cell(&mut cell)));

    assert!(result.is_err());
    assert!(cell.is_none());
}

#[test]
fn test_expired_weak_never_yields_handle() {
    let h = make_shared(1);
    let weak = SharedRef::downgrade(&h);
    drop(h);

    assert!(SharedRef::upgrade(&weak).is_none());
}
