use proptest::prelude::*;
use roomsim_core::{CueData, CueEventKind, CueEvents, Square};
use strum::IntoEnumIterator;

fn kind() -> impl Strategy<Value = CueEventKind> {
    prop::sample::select(CueEventKind::iter().collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn clear_forgets_every_occurrence(
        events in prop::collection::vec((kind(), any::<bool>(), 0_u32..40, 0_u32..40), 0..64)
    ) {
        let mut cues = CueEvents::new();
        for (kind, attach, column, row) in &events {
            if *attach {
                cues.add_attached(*kind, CueData::Square(Square::new(*column, *row)));
            } else {
                cues.add(*kind, None);
            }
        }
        for kind in CueEventKind::iter() {
            let expected = events.iter().filter(|(added, ..)| *added == kind).count();
            prop_assert_eq!(cues.occurrence_count(kind) as usize, expected);
        }

        cues.clear();

        for kind in CueEventKind::iter() {
            prop_assert!(!cues.has_occurred(kind));
            prop_assert_eq!(cues.occurrence_count(kind), 0);
            prop_assert!(cues.first_payload(kind).is_none());
        }
        prop_assert!(cues.is_empty());
    }
}
