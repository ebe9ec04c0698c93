//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port, method and call arguments.
///
/// Upstream calls run concurrently, so completion order in a recording is
/// not stable. Matching on the arguments as well makes replay independent
/// of that order.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CallKey {
    port: String,
    method: String,
    input: String,
}

impl CallKey {
    fn new(port: &str, method: &str, input: &serde_json::Value) -> Self {
        Self { port: port.to_string(), method: method.to_string(), input: input.to_string() }
    }
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per call key.
///
/// Once every recording for a key has been served, the last one keeps
/// being returned: the same request against an unchanged upstream gets
/// the same answer.
pub struct CassetteReplayer {
    /// Per call-key queue of interactions (in order).
    queues: HashMap<CallKey, Vec<Interaction>>,
    /// Per call-key cursor tracking position.
    cursors: HashMap<CallKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<CallKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = CallKey::new(&interaction.port, &interaction.method, &interaction.input);
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction recorded for the given call.
    ///
    /// # Errors
    ///
    /// Returns a description of the request when the cassette holds no
    /// interaction for it.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Result<&Interaction, String> {
        let key = CallKey::new(port, method, input);
        let Some(queue) = self.queues.get(&key) else {
            let recorded = self
                .queues
                .keys()
                .filter(|k| k.port == port && k.method == method)
                .count();
            return Err(format!(
                "no interaction recorded for {port}::{method} with input {input} \
                 ({recorded} other {port}::{method} calls in cassette)"
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let index = (*cursor).min(queue.len() - 1);
        *cursor += 1;
        Ok(&queue[index])
    }
}
