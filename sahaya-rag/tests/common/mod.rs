#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sahaya_core::{
    Embedding, EmbeddingError, GenerationError, Llm, RetrievedPassage, Retriever, StoreError,
};

#[derive(Clone, Default)]
pub struct Calls {
    pub embed: Arc<AtomicUsize>,
    pub retrieve: Arc<AtomicUsize>,
    pub generate: Arc<AtomicUsize>,
    pub top_k: Arc<Mutex<Option<usize>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl Calls {
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.embed.load(Ordering::SeqCst),
            self.retrieve.load(Ordering::SeqCst),
            self.generate.load(Ordering::SeqCst),
        )
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().expect("a prompt")
    }
}

pub enum EmbedBehaviour {
    Vector(Vec<f32>),
    Fail,
    Hang,
}

pub struct FakeEmbedding {
    pub calls: Calls,
    pub behaviour: EmbedBehaviour,
}

#[async_trait::async_trait]
impl Embedding for FakeEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.embed.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            EmbedBehaviour::Vector(v) => Ok(v.clone()),
            EmbedBehaviour::Fail => Err(EmbeddingError::Provider("API key not valid".to_string())),
            EmbedBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec![1.0])
            }
        }
    }

    fn dimension(&self) -> usize {
        2
    }
}

pub struct FakeRetriever {
    pub calls: Calls,
    pub texts: Vec<&'static str>,
    pub fail: bool,
}

#[async_trait::async_trait]
impl Retriever for FakeRetriever {
    async fn retrieve(
        &self,
        _query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, StoreError> {
        self.calls.retrieve.fetch_add(1, Ordering::SeqCst);
        *self.calls.top_k.lock().unwrap() = Some(top_k);
        if self.fail {
            return Err(StoreError::Internal("index unavailable".into()));
        }
        Ok(self
            .texts
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(rank, text)| RetrievedPassage {
                id: format!("m{rank}"),
                text: text.to_string(),
                rank,
                score: 0.9 - rank as f32 * 0.1,
            })
            .collect())
    }
}

pub struct FakeLlm {
    pub calls: Calls,
    pub fail: bool,
}

#[async_trait::async_trait]
impl Llm for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.generate.fetch_add(1, Ordering::SeqCst);
        self.calls.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(GenerationError::Blocked("SAFETY".to_string()));
        }
        Ok("Here is what you need.".to_string())
    }
}

pub fn fakes(
    calls: &Calls,
    embed: EmbedBehaviour,
    texts: Vec<&'static str>,
) -> (FakeEmbedding, FakeRetriever, FakeLlm) {
    (
        FakeEmbedding {
            calls: calls.clone(),
            behaviour: embed,
        },
        FakeRetriever {
            calls: calls.clone(),
            texts,
            fail: false,
        },
        FakeLlm {
            calls: calls.clone(),
            fail: false,
        },
    )
}
