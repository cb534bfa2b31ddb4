//! Property-based tests for reaction toggling against the database.
//!
//! Toggling is an involution per visitor: two toggles restore both the
//! count and the visitor's membership, whatever other visitors did.

use mdshare::database::Database;
use mdshare::managers::markdown_manager::{MarkdownManager, MarkdownManagerTrait};
use mdshare::managers::reaction_manager::{ReactionManager, ReactionManagerTrait};
use mdshare::managers::visitor_manager::{VisitorManager, VisitorManagerTrait};
use mdshare::types::reaction::ReactionType;
use proptest::prelude::*;

// **Property 5: Double toggle restores state**
//
// *For any* set of visitors who have already reacted, toggling one visitor
// twice leaves the count and that visitor's membership unchanged.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn double_toggle_restores_count_and_membership(
        visitors in 1usize..6,
        reacted in prop::collection::vec(any::<bool>(), 6),
        pick in 0usize..6,
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let doc = MarkdownManager::new(db.connection())
            .create("# Doc", None)
            .expect("create markdown");

        let mut ids = Vec::new();
        for _ in 0..visitors {
            let v = VisitorManager::new(db.connection())
                .identify(None, None)
                .expect("identify");
            ids.push(v.id);
        }

        let mut reactions = ReactionManager::new(db.connection());
        for (id, on) in ids.iter().zip(reacted.iter()) {
            if *on {
                reactions.toggle(&doc.id, id, ReactionType::Like).expect("seed toggle");
            }
        }

        let subject = &ids[pick % ids.len()];
        let before = reactions.summary(&doc.id, Some(subject), ReactionType::Like).expect("summary");

        let first = reactions.toggle(&doc.id, subject, ReactionType::Like).expect("first toggle");
        prop_assert_eq!(first, !before.user_reacted);
        let mid = reactions.summary(&doc.id, Some(subject), ReactionType::Like).expect("summary");
        prop_assert_eq!(mid.count, before.count + if first { 1 } else { -1 });

        reactions.toggle(&doc.id, subject, ReactionType::Like).expect("second toggle");
        let after = reactions.summary(&doc.id, Some(subject), ReactionType::Like).expect("summary");
        prop_assert_eq!(after, before);
    }
}

// **Property 6: Count equals the number of reacting visitors**
//
// *For any* toggle sequence, the count equals the number of visitors whose
// toggle count is odd.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn count_matches_odd_toggles(sequence in prop::collection::vec(0usize..4, 0..20)) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let doc = MarkdownManager::new(db.connection())
            .create("# Doc", None)
            .expect("create markdown");
        let ids: Vec<String> = (0..4)
            .map(|_| {
                VisitorManager::new(db.connection())
                    .identify(None, None)
                    .expect("identify")
                    .id
            })
            .collect();

        let mut reactions = ReactionManager::new(db.connection());
        let mut toggles = [0usize; 4];
        for i in &sequence {
            reactions.toggle(&doc.id, &ids[*i], ReactionType::Like).expect("toggle");
            toggles[*i] += 1;
        }

        let expected = toggles.iter().filter(|n| *n % 2 == 1).count() as i64;
        prop_assert_eq!(reactions.count(&doc.id, ReactionType::Like).expect("count"), expected);
    }
}
