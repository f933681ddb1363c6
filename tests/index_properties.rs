//! Vector index persistence and search ordering

use approx::assert_relative_eq;
use neurohr::{Chunk, ChunkKind, Embedder, HashEmbedder, VectorIndex};
use tempfile::tempdir;

fn sample_chunks() -> Vec<Chunk> {
    vec![
        Chunk::new("Python developer with Django and PostgreSQL", "r1", ChunkKind::Resume),
        Chunk::new("Sales manager with CRM and negotiation skills", "r2", ChunkKind::Resume),
        Chunk::new("Data engineer with Spark and Python", "r3", ChunkKind::Resume),
        Chunk::new("Accountant familiar with tax reporting", "r4", ChunkKind::Resume),
    ]
}

#[tokio::test]
async fn test_saved_index_answers_like_the_built_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let embedder = HashEmbedder::new(128);

    let built = VectorIndex::build_and_save(&embedder, sample_chunks(), dir.path(), "db_resumes").await?;
    let loaded = VectorIndex::load(&embedder, dir.path(), "db_resumes").ok_or("index not loaded")?;
    assert_eq!(loaded.len(), 4);

    let query = "Python backend developer";
    let a = built.similarity_search(&embedder, query, 3).await;
    let b = loaded.similarity_search(&embedder, query, 3).await;
    assert_eq!(a.len(), b.len());
    for ((score_a, id_a), (score_b, id_b)) in a.iter().zip(b.iter()) {
        assert_eq!(id_a, id_b);
        assert_relative_eq!(*score_a, *score_b, epsilon = 1e-6);
    }

    Ok(())
}

#[tokio::test]
async fn test_rebuild_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let embedder = HashEmbedder::new(128);

    VectorIndex::build_and_save(&embedder, sample_chunks(), dir.path(), "idx").await?;
    let first = VectorIndex::load(&embedder, dir.path(), "idx").ok_or("first load")?;
    VectorIndex::build_and_save(&embedder, sample_chunks(), dir.path(), "idx").await?;
    let second = VectorIndex::load(&embedder, dir.path(), "idx").ok_or("second load")?;

    let query = "sales negotiations";
    assert_eq!(
        first.similarity_search(&embedder, query, 4).await,
        second.similarity_search(&embedder, query, 4).await
    );

    Ok(())
}

#[tokio::test]
async fn test_search_respects_k_and_orders_by_distance() -> Result<(), Box<dyn std::error::Error>> {
    let embedder = HashEmbedder::new(128);
    let index = VectorIndex::build(&embedder, sample_chunks()).await?;

    for k in 0..=6 {
        let hits = index.similarity_search(&embedder, "Python Spark data", k).await;
        assert_eq!(hits.len(), k.min(4));
        assert!(hits.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    let query_vector = embedder.embed_query("Python Spark data").await?;
    let best = &index.similarity_search(&embedder, "Python Spark data", 1).await[0];
    let r3 = HashEmbedder::new(128).encode("Data engineer with Spark and Python");
    let expected: f32 = query_vector.iter().zip(&r3).map(|(q, v)| (q - v) * (q - v)).sum();
    assert_eq!(best.1, "r3");
    assert_relative_eq!(best.0, expected, epsilon = 1e-5);

    Ok(())
}

#[tokio::test]
async fn test_index_from_other_embedder_is_not_loaded() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    VectorIndex::build_and_save(&HashEmbedder::new(64), sample_chunks(), dir.path(), "idx").await?;

    assert!(VectorIndex::load(&HashEmbedder::new(128), dir.path(), "idx").is_none());
    assert!(VectorIndex::load(&HashEmbedder::new(64), dir.path(), "missing").is_none());

    Ok(())
}
