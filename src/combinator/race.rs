//! First settlement wins.

use crate::error::ResolveError;
use crate::promise::{Promise, Settler};
use crate::realm::Realm;
use crate::resolution::Resolution;

/// Returns a promise mirroring whichever input settles first.
///
/// Non-promise elements are wrapped as already-fulfilled promises, so a
/// plain value in the input wins any race against pending promises.
/// Later settlements of other inputs land on the already-terminal
/// result and are ignored. An empty input never settles.
pub fn race<T, E, I>(realm: &Realm, inputs: I) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<ResolveError> + 'static,
    I: IntoIterator,
    I::Item: Into<Resolution<T, E>>,
{
    let inputs: Vec<Resolution<T, E>> = inputs.into_iter().map(Into::into).collect();
    let factory = realm.clone();
    realm.promise(move |settler: Settler<T, E>| {
        for input in inputs {
            let element = factory.fulfilled(input);
            let fulfill_settler = settler.clone();
            let reject_settler = settler.clone();
            let _ = element.then_catch::<(), _, _>(
                move |value| {
                    fulfill_settler.fulfill(value);
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
