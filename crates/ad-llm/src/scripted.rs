//! Generador con respuestas guionadas, para probar etapas sin red.
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::LlmError;
use crate::generator::{GenerationRequest, TextGenerator};

/// Devuelve las respuestas encoladas en orden y registra cada petición.
/// Cola vacía => `LlmError::Unavailable`.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<String, String>>>,
    calls: RefCell<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.borrow_mut().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.borrow_mut().push_back(Err(message.into()));
        self
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.calls.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(LlmError::Unavailable(msg)),
            None => Err(LlmError::Unavailable("no scripted reply left".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ResponseProfile;

    #[test]
    fn replays_in_order_then_fails() {
        let g = ScriptedGenerator::new().reply("first").fail("down");
        let req = GenerationRequest::new("p", ResponseProfile::Generic);
        assert_eq!(g.generate(&req).expect("first"), "first");
        assert!(g.generate(&req).is_err());
        assert!(g.generate(&req).is_err());
        assert_eq!(g.call_count(), 3);
        assert_eq!(g.calls()[0].prompt, "p");
    }
}
