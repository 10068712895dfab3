#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use fibstream::subscribe::Subscriber;

/// Records every call a `Subscriber` receives.
#[derive(Clone, Default)]
pub struct Emitted {
    pub nexts: Arc<Mutex<Vec<i64>>>,
    pub errors: Arc<Mutex<Vec<String>>>,
    pub completes: Arc<Mutex<usize>>,
}

impl Emitted {
    pub fn nexts(&self) -> Vec<i64> {
        self.nexts.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn completes(&self) -> usize {
        *self.completes.lock().unwrap()
    }

    pub fn subscriber(&self) -> Subscriber<i64> {
        let nexts = Arc::clone(&self.nexts);
        let errors = Arc::clone(&self.errors);
        let completes = Arc::clone(&self.completes);

        Subscriber::new(
            move |n| {
                // Track next() calls.
                nexts.lock().unwrap().push(n);
            },
            move |e| {
                // Track error() calls.
                errors.lock().unwrap().push(e.to_string());
            },
            move || {
                // Track complete() calls.
                *completes.lock().unwrap() += 1;
            },
        )
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
