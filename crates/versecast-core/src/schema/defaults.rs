//! Shipped default layouts for each theme variant

use super::{LineDefinition, LineTypeSchema, ReferenceDefinition};
use crate::types::{
    AlignH, AlignV, FontWeight, LinePosition, LineStyle, ReferenceSlot, ThemeVariant,
};

const TEXT_COLOR: &str = "#FFFFFF";
const REFERENCE_COLOR: &str = "#F5D76E";

fn line(
    id: &str,
    label: &'static str,
    position: LinePosition,
    style: LineStyle,
    sample_text: &'static str,
) -> LineDefinition {
    LineDefinition {
        id: id.into(),
        label,
        position,
        style,
        sample_text,
    }
}

pub(super) fn generic() -> LineTypeSchema {
    LineTypeSchema::new(
        ThemeVariant::Generic,
        vec![
            line(
                "original",
                "Original",
                LinePosition::new(5.0, 58.0, 90.0, 16.0).padded(1.0, 1.0),
                LineStyle::new(5.0, FontWeight::Bold, TEXT_COLOR),
                "Amazing grace, how sweet the sound",
            ),
            line(
                "translation",
                "Translation",
                LinePosition::new(5.0, 76.0, 90.0, 12.0).padded(0.5, 1.0),
                LineStyle::new(3.5, FontWeight::Normal, TEXT_COLOR).with_opacity(0.9),
                "That saved a wretch like me",
            ),
        ],
        Vec::new(),
    )
}

pub(super) fn bible() -> LineTypeSchema {
    LineTypeSchema::new(
        ThemeVariant::Bible,
        vec![
            line(
                "hebrew",
                "Hebrew",
                LinePosition::new(5.0, 52.0, 90.0, 18.0).padded(1.0, 1.0),
                LineStyle::new(5.5, FontWeight::Bold, TEXT_COLOR),
                "בְּרֵאשִׁית בָּרָא אֱלֹהִים אֵת הַשָּׁמַיִם וְאֵת הָאָרֶץ",
            ),
            line(
                "english",
                "English",
                LinePosition::new(5.0, 71.0, 90.0, 14.0).padded(0.5, 1.0),
                LineStyle::new(3.5, FontWeight::Normal, TEXT_COLOR).with_opacity(0.9),
                "In the beginning God created the heavens and the earth.",
            ),
        ],
        vec![
            ReferenceDefinition {
                slot: ReferenceSlot::Reference,
                line: line(
                    "reference",
                    "Reference",
                    LinePosition::new(5.0, 87.0, 40.0, 8.0).aligned(AlignH::Left, AlignV::Bottom),
                    LineStyle::new(2.5, FontWeight::Medium, REFERENCE_COLOR),
                    "בראשית א:א",
                ),
            },
            ReferenceDefinition {
                slot: ReferenceSlot::ReferenceEnglish,
                line: line(
                    "referenceEnglish",
                    "Reference (English)",
                    LinePosition::new(55.0, 87.0, 40.0, 8.0)
                        .aligned(AlignH::Right, AlignV::Bottom),
                    LineStyle::new(2.5, FontWeight::Medium, REFERENCE_COLOR),
                    "Genesis 1:1",
                ),
            },
        ],
    )
}

pub(super) fn song() -> LineTypeSchema {
    LineTypeSchema::new(
        ThemeVariant::Song,
        vec![
            line(
                "original",
                "Original",
                LinePosition::new(5.0, 50.0, 90.0, 15.0).padded(1.0, 0.5),
                LineStyle::new(5.0, FontWeight::Bold, TEXT_COLOR),
                "הַלְלוּ יָהּ",
            ),
            line(
                "transliteration",
                "Transliteration",
                LinePosition::new(5.0, 66.0, 90.0, 11.0).padded(0.5, 0.5),
                LineStyle::new(3.5, FontWeight::Medium, TEXT_COLOR).with_opacity(0.85),
                "Halelu Yah",
            ),
            line(
                "translation",
                "Translation",
                LinePosition::new(5.0, 78.0, 90.0, 11.0).padded(0.5, 1.0),
                LineStyle::new(3.2, FontWeight::Normal, TEXT_COLOR).with_opacity(0.85),
                "Praise the Lord",
            ),
        ],
        Vec::new(),
    )
}
