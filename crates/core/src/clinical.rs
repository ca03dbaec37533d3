//! Clinical classification enumerations used by surgery and follow-up forms.
//!
//! Keys start at 1 and are the tokens submitted by selection widgets; they are also what the
//! persistence layer stores, so existing keys must never be renumbered.

use crate::choices::choice_enum;

choice_enum! {
    /// CEPOD classification of the operation's urgency.
    Cepod {
        Planned = 1 => "Planned",
        Emergency = 2 => "Emergency",
    }
}

choice_enum! {
    Side {
        Left = 1 => "Left",
        Right = 2 => "Right",
    }
}

choice_enum! {
    /// Whether the hernia is a first presentation or a recurrence.
    Occurrence {
        Primary = 1 => "Primary",
        Recurrent = 2 => "Recurrent",
        ReRecurrent = 3 => "Re-recurrent",
    }
}

choice_enum! {
    InguinalHerniaType {
        Direct = 1 => "Direct",
        Indirect = 2 => "Indirect",
        Pantaloon = 3 => "Pantaloon",
    }
}

choice_enum! {
    Complexity {
        Simple = 1 => "Simple",
        Incarcerated = 2 => "Incarcerated",
        Obstructed = 3 => "Obstructed",
        Strangulated = 4 => "Strangulated",
    }
}

choice_enum! {
    AnestheticType {
        Local = 1 => "Local",
        Spinal = 2 => "Spinal",
        General = 3 => "General",
    }
}

choice_enum! {
    /// Pain reported at follow-up. Anything other than `NoPain` needs a description.
    Pain {
        NoPain = 1 => "No Pain",
        Minimal = 2 => "Minimal",
        Mild = 3 => "Mild",
        Moderate = 4 => "Moderate",
        Severe = 5 => "Severe",
    }
}

/// Names accepted by [`choices_by_enum_name`].
pub const ENUM_NAMES: &[&str] = &[
    "Cepod",
    "Side",
    "Occurrence",
    "InguinalHerniaType",
    "Complexity",
    "AnestheticType",
    "Pain",
];

/// Choice list for a clinical enumeration looked up by its type name (case-insensitive).
///
/// Used by callers that only know the enumeration from a path segment or CLI argument.
pub fn choices_by_enum_name(
    name: &str,
    include_blank: bool,
) -> Option<Vec<registry_types::Choice>> {
    use crate::choices::choices_for;

    let choices = match name.to_ascii_lowercase().as_str() {
        "cepod" => choices_for::<Cepod>(include_blank),
        "side" => choices_for::<Side>(include_blank),
        "occurrence" => choices_for::<Occurrence>(include_blank),
        "inguinalherniatype" | "hernia_type" => choices_for::<InguinalHerniaType>(include_blank),
        "complexity" => choices_for::<Complexity>(include_blank),
        "anesthetictype" | "anaesthetic_type" => choices_for::<AnestheticType>(include_blank),
        "pain" => choices_for::<Pain>(include_blank),
        _ => return None,
    };
    Some(choices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::{coerce, ChoiceEnum};

    fn assert_round_trip<E: ChoiceEnum>() {
        for &variant in E::VARIANTS {
            assert_eq!(coerce::<E>(Some(&variant.token())), Ok(Some(variant)));
            assert_eq!(coerce::<E>(Some(variant.name())), Ok(Some(variant)));
            let qualified = format!("{}.{}", E::TYPE_NAME, variant.name());
            assert_eq!(coerce::<E>(Some(&qualified)), Ok(Some(variant)));
        }
    }

    #[test]
    fn all_clinical_enums_round_trip() {
        assert_round_trip::<Cepod>();
        assert_round_trip::<Side>();
        assert_round_trip::<Occurrence>();
        assert_round_trip::<InguinalHerniaType>();
        assert_round_trip::<Complexity>();
        assert_round_trip::<AnestheticType>();
        assert_round_trip::<Pain>();
    }

    #[test]
    fn keys_are_unique_within_each_enum() {
        fn unique<E: ChoiceEnum>() -> bool {
            let mut keys: Vec<i64> = E::VARIANTS.iter().map(|v| v.key()).collect();
            keys.sort_unstable();
            keys.dedup();
            keys.len() == E::VARIANTS.len()
        }
        assert!(unique::<Cepod>());
        assert!(unique::<Occurrence>());
        assert!(unique::<Pain>());
        assert!(unique::<Complexity>());
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Occurrence::ReRecurrent.to_string(), "Re-recurrent");
        assert_eq!(Pain::NoPain.to_string(), "No Pain");
    }

    #[test]
    fn every_listed_enum_name_resolves() {
        for name in ENUM_NAMES {
            let choices = choices_by_enum_name(name, true).expect("listed name must resolve");
            assert!(choices[0].is_blank());
            assert!(choices.len() > 2);
        }
        assert!(choices_by_enum_name("Gender", false).is_none());
    }
}
