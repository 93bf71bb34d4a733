//! Property tests for in-memory index search ordering and dedup merging.

use answerkit_rag::document::{dedup_key, ChunkMetadata, RetrievedChunk};
use answerkit_rag::retrieve::merge_unique;
use answerkit_rag::{IndexedChunk, InMemoryVectorIndex, VectorIndex};
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate an indexed chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = IndexedChunk> {
    ("[a-z]{5,30}", arb_normalized_embedding(dim)).prop_map(|(text, embedding)| IndexedChunk {
        text,
        embedding,
        metadata: ChunkMetadata { source: "products".into(), row: None, chunk_type: None },
    })
}

/// For any set of stored chunks, searching returns results ordered by
/// descending cosine similarity, bounded by `top_k` and by the number of
/// distinct stored texts.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, distinct_texts) = rt.block_on(async {
                let index = InMemoryVectorIndex::new();
                index.upsert(&chunks).await.unwrap();
                let results = index.search(&query, top_k).await.unwrap();
                let distinct: std::collections::HashSet<&str> =
                    chunks.iter().map(|c| c.text.as_str()).collect();
                (results, distinct.len())
            });

            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= distinct_texts);

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

/// Merging is idempotent and first-occurrence-wins: re-merging any batch
/// never grows the accumulator, and the surviving score for a key is the
/// first one seen.
mod prop_merge_dedup {
    use super::*;

    fn arb_retrieved() -> impl Strategy<Value = RetrievedChunk> {
        ("[a-c]{1,4}", 0.0f32..1.0f32).prop_map(|(text, score)| RetrievedChunk {
            text,
            metadata: ChunkMetadata::default(),
            score,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn remerge_is_idempotent(
            batch in proptest::collection::vec(arb_retrieved(), 0..20),
        ) {
            let mut accumulated = Vec::new();
            merge_unique(&mut accumulated, batch.clone(), 100);
            let after_first = accumulated.clone();
            merge_unique(&mut accumulated, batch, 100);
            prop_assert_eq!(accumulated, after_first);
        }

        #[test]
        fn first_occurrence_wins(
            batch in proptest::collection::vec(arb_retrieved(), 1..20),
        ) {
            let mut accumulated = Vec::new();
            merge_unique(&mut accumulated, batch.clone(), 100);

            for kept in &accumulated {
                let first = batch
                    .iter()
                    .find(|c| dedup_key(&c.text, 100) == dedup_key(&kept.text, 100))
                    .unwrap();
                prop_assert_eq!(kept.score, first.score);
            }
        }
    }
}
