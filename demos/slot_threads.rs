use std::{sync::Arc, thread};

use shared_ref::{make_shared, SharedSlot};

pub fn main() {
    let current = Arc::new(SharedSlot::new(make_shared(String::from("v0"))));

    let writers: Vec<_> = (1..=3)
        .map(|version| {
            let current = current.clone();
            thread::spawn(move || {
                let previous = current.replace(make_shared(format!("v{}", version)));
                println!("writer {} replaced {}", version, previous);
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    println!("final: {}", current.load());
}
