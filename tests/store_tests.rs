//! Behavioral tests shared by every `MovieStore` implementation.

use moviesdb::{
    FjallStore, MemoryStore, MovieError, MovieFields, MovieInput, MovieStore, ObjectId,
};
use std::sync::Barrier;
use std::thread;

use tempfile::TempDir;

fn fields(name: &str, description: &str, cover_image: &str) -> MovieFields {
    MovieFields {
        name: name.to_string(),
        description: description.to_string(),
        cover_image: cover_image.to_string(),
    }
}

/// Run `check` against a fresh fjall store and a fresh memory store.
fn for_each_store(check: impl Fn(&dyn MovieStore) -> anyhow::Result<()>) -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let fjall = FjallStore::init(temp_dir.path().join("db"), "movies")?;
    check(&fjall)?;

    let memory = MemoryStore::new();
    check(&memory)?;
    Ok(())
}

#[test]
fn test_create_then_get_round_trips_fields() -> anyhow::Result<()> {
    for_each_store(|store| {
        let input = MovieInput::new(fields("Inception", "Dreams", "inception.jpg"));
        let inserted = store.create(input)?;
        assert!(inserted.acknowledged);

        let movie = store.get_by_id(&inserted.inserted_id)?;
        assert_eq!(movie.id, inserted.inserted_id);
        assert_eq!(movie.name, "Inception");
        assert_eq!(movie.description, "Dreams");
        assert_eq!(movie.cover_image, "inception.jpg");
        Ok(())
    })
}

#[test]
fn test_get_after_delete_is_not_found() -> anyhow::Result<()> {
    for_each_store(|store| {
        let id = store.create(MovieInput::new(fields("Rope", "", "")))?.inserted_id;

        assert_eq!(store.delete_by_id(&id)?.deleted_count, 1);

        let err = store.get_by_id(&id).unwrap_err();
        assert!(matches!(err, MovieError::NotFound(missing) if missing == id));
        Ok(())
    })
}

#[test]
fn test_delete_unknown_id_is_zero_count() -> anyhow::Result<()> {
    for_each_store(|store| {
        store.create(MovieInput::new(fields("Kept", "", "")))?;

        let result = store.delete_by_id(&ObjectId::new())?;
        assert_eq!(result.deleted_count, 0);
        assert_eq!(store.list_all()?.len(), 1);
        Ok(())
    })
}

#[test]
fn test_delete_twice_reports_zero_second_time() -> anyhow::Result<()> {
    for_each_store(|store| {
        let id = store.create(MovieInput::new(fields("Once", "", "")))?.inserted_id;
        assert_eq!(store.delete_by_id(&id)?.deleted_count, 1);
        assert_eq!(store.delete_by_id(&id)?.deleted_count, 0);
        Ok(())
    })
}

#[test]
fn test_update_overwrites_instead_of_merging() -> anyhow::Result<()> {
    for_each_store(|store| {
        let id = store
            .create(MovieInput::new(fields("Before", "Desc", "cover.png")))?
            .inserted_id;

        let update = MovieFields {
            name: "X".to_string(),
            ..MovieFields::default()
        };
        let result = store.update_fields(&id, update)?;
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 1);

        let movie = store.get_by_id(&id)?;
        assert_eq!(movie.id, id);
        assert_eq!(movie.name, "X");
        assert_eq!(movie.description, "");
        assert_eq!(movie.cover_image, "");
        Ok(())
    })
}

#[test]
fn test_update_unknown_id_matches_nothing() -> anyhow::Result<()> {
    for_each_store(|store| {
        let result = store.update_fields(&ObjectId::new(), fields("Ghost", "", ""))?;
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.modified_count, 0);
        assert!(store.list_all()?.is_empty());
        Ok(())
    })
}

#[test]
fn test_find_by_name_is_exact_and_case_sensitive() -> anyhow::Result<()> {
    for_each_store(|store| {
        for name in ["Inception", "inception", "Inception 2", "Inception", "The Inception"] {
            store.create(MovieInput::new(fields(name, "", "")))?;
        }

        let found = store.find_by_name("Inception")?;
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|m| m.name == "Inception"));

        assert!(store.find_by_name("INCEPTION")?.is_empty());
        Ok(())
    })
}

#[test]
fn test_list_all_on_empty_store_is_empty() -> anyhow::Result<()> {
    for_each_store(|store| {
        assert!(store.list_all()?.is_empty());
        assert!(store.find_by_name("anything")?.is_empty());
        Ok(())
    })
}

#[test]
fn test_list_all_after_mixed_operations() -> anyhow::Result<()> {
    for_each_store(|store| {
        let a = store.create(MovieInput::new(fields("A", "", "")))?.inserted_id;
        let b = store.create(MovieInput::new(fields("B", "", "")))?.inserted_id;
        store.create(MovieInput::new(fields("C", "", "")))?;

        store.delete_by_id(&b)?;
        store.update_fields(&a, fields("A2", "", ""))?;

        let mut names: Vec<String> = store.list_all()?.into_iter().map(|m| m.name).collect();
        names.sort();
        assert_eq!(names, vec!["A2", "C"]);
        Ok(())
    })
}

#[test]
fn test_client_supplied_id_is_kept() -> anyhow::Result<()> {
    for_each_store(|store| {
        let id = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b")?;
        let inserted = store.create(MovieInput::with_id(id, fields("Mine", "", "")))?;
        assert_eq!(inserted.inserted_id, id);

        let err = store
            .create(MovieInput::with_id(id, fields("Again", "", "")))
            .unwrap_err();
        assert!(matches!(err, MovieError::DuplicateId(_)));
        Ok(())
    })
}

#[test]
fn test_flush_succeeds() -> anyhow::Result<()> {
    for_each_store(|store| {
        store.create(MovieInput::new(fields("Flushed", "", "")))?;
        store.flush()?;
        Ok(())
    })
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

const WRITERS: usize = 8;

#[test]
fn test_concurrent_creates_with_same_id_admit_one() -> anyhow::Result<()> {
    for_each_store(|store| {
        for round in 0..20 {
            let id = ObjectId::new();
            let barrier = Barrier::new(WRITERS);

            let results: Vec<_> = thread::scope(|s| {
                let handles: Vec<_> = (0..WRITERS)
                    .map(|writer| {
                        let barrier = &barrier;
                        s.spawn(move || {
                            let name = format!("writer {writer}");
                            barrier.wait();
                            store.create(MovieInput::with_id(id, fields(&name, "", "")))
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let accepted = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(accepted, 1, "round {round}: {results:?}");
            assert!(
                results
                    .iter()
                    .filter_map(|r| r.as_ref().err())
                    .all(|e| matches!(e, MovieError::DuplicateId(dup) if *dup == id))
            );

            let winner = results
                .iter()
                .find_map(|r| r.as_ref().ok())
                .map(|inserted| inserted.inserted_id);
            assert_eq!(winner, Some(id));
            assert!(store.get_by_id(&id)?.name.starts_with("writer "));
        }
        Ok(())
    })
}

#[test]
fn test_update_racing_delete_never_revives_movie() -> anyhow::Result<()> {
    for_each_store(|store| {
        for round in 0..100 {
            let id = store.create(MovieInput::new(fields("A", "", "")))?.inserted_id;
            let barrier = Barrier::new(2);

            let (updated, deleted) = thread::scope(|s| {
                let updater = s.spawn(|| {
                    barrier.wait();
                    store.update_fields(&id, fields("B", "", ""))
                });
                let deleter = s.spawn(|| {
                    barrier.wait();
                    store.delete_by_id(&id)
                });
                (updater.join().unwrap(), deleter.join().unwrap())
            });

            assert_eq!(deleted?.deleted_count, 1, "round {round}");
            assert!(updated?.matched_count <= 1);
            assert!(
                store.get_by_id(&id).unwrap_err().is_not_found(),
                "round {round}: deleted movie is still readable"
            );
        }
        assert!(store.list_all()?.is_empty());
        Ok(())
    })
}

#[test]
fn test_concurrent_creates_get_distinct_ids() -> anyhow::Result<()> {
    for_each_store(|store| {
        let barrier = Barrier::new(WRITERS);

        let ids: Vec<ObjectId> = thread::scope(|s| {
            let handles: Vec<_> = (0..WRITERS)
                .map(|writer| {
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        store.create(MovieInput::new(fields(&format!("m{writer}"), "", "")))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().map(|r| r.inserted_id))
                .collect::<Result<Vec<_>, MovieError>>()
        })?;

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), WRITERS);
        assert_eq!(store.list_all()?.len(), WRITERS);
        Ok(())
    })
}
