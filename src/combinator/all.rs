//! Wait for every input, in order.

use crate::error::ResolveError;
use crate::promise::{Promise, Settler};
use crate::realm::Realm;
use crate::resolution::Resolution;
use std::sync::{Arc, Mutex};

/// Per-combinator slot buffer shared by every element subscription.
struct AllSlots<T> {
    values: Vec<Option<T>>,
    filled: usize,
}

impl<T> AllSlots<T> {
    fn new(len: usize) -> Self {
        Self {
            values: (0..len).map(|_| None).collect(),
            filled: 0,
        }
    }

    /// Stores a value at its input position. Returns true when this
    /// fill completes the set.
    fn fill(&mut self, index: usize, value: T) -> bool {
        self.values[index] = Some(value);
        self.filled += 1;
        self.filled == self.values.len()
    }

    fn take_values(&mut self) -> Vec<T> {
        self.values
            .drain(..)
            .map(|slot| slot.expect("every slot filled at completion"))
            .collect()
    }
}

/// Returns a promise for the values of every input, in input order.
///
/// Non-promise elements are wrapped as already-fulfilled promises. The
/// result fulfills with one value per input, positionally ordered
/// regardless of settlement order, once every input fulfills; it
/// rejects with the first rejection reason as soon as any input
/// rejects. An empty input fulfills immediately with an empty `Vec`.
pub fn all<T, E, I>(realm: &Realm, inputs: I) -> Promise<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
    I: IntoIterator,
    I::Item: Into<Resolution<T, E>>,
{
    let inputs: Vec<Resolution<T, E>> = inputs.into_iter().map(Into::into).collect();
    let factory = realm.clone();
    realm.promise(move |settler: Settler<Vec<T>, E>| {
        if inputs.is_empty() {
            settler.fulfill(Vec::new());
            return Ok(());
        }

        let slots = Arc::new(Mutex::new(AllSlots::new(inputs.len())));
        for (index, input) in inputs.into_iter().enumerate() {
            let element = factory.fulfilled(input);
            let slots = Arc::clone(&slots);
            let fulfill_settler = settler.clone();
            let reject_settler = settler.clone();
            let _ = element.then_catch::<(), _, _>(
                move |value| {
                    let completed = {
                        let mut slots = slots.lock().expect("lock poisoned");
                        if slots.fill(index, value) {
                            Some(slots.take_values())
                        } else {
                            None
                        }
                    };
                    if let Some(values) = completed {
                        fulfill_settler.fulfill(values);
                    }
                    Ok(Resolution::Value(()))
                },
                move |reason| {
                    reject_settler.reject(reason.clone());
                    Err(reason)
                },
            );
        }
        Ok(())
    })
}
