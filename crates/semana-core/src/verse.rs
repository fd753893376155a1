//! Verse of the day

use chrono::{Datelike, NaiveDate, Utc};

use crate::models::Verse;

/// Rotation of daily verses
pub const VERSES: [Verse; 7] = [
    Verse {
        reference: "Salmo 23:1",
        text: "El Señor es mi pastor, nada me falta.",
    },
    Verse {
        reference: "Salmo 91:1",
        text: "El que habita al abrigo del Altísimo morará bajo la sombra del Omnipotente.",
    },
    Verse {
        reference: "Salmo 121:1-2",
        text: "Alzaré mis ojos a los montes; ¿de dónde vendrá mi socorro? Mi socorro viene de Jehová, que hizo los cielos y la tierra.",
    },
    Verse {
        reference: "Proverbios 3:5-6",
        text: "Fíate de Jehová de todo tu corazón, y no te apoyes en tu propia prudencia. Reconócelo en todos tus caminos, y él enderezará tus veredas.",
    },
    Verse {
        reference: "Filipenses 4:13",
        text: "Todo lo puedo en Cristo que me fortalece.",
    },
    Verse {
        reference: "Isaías 41:10",
        text: "No temas, porque yo estoy contigo; no desmayes, porque yo soy tu Dios que te esfuerzo; siempre te ayudaré, siempre te sustentaré con la diestra de mi justicia.",
    },
    Verse {
        reference: "Josué 1:9",
        text: "Mira que te mando que te esfuerces y seas valiente; no temas ni desmayes, porque Jehová tu Dios estará contigo en dondequiera que vayas.",
    },
];

/// The verse for a calendar date, picked by zero-based day of the year
pub fn verse_for(date: NaiveDate) -> Verse {
    VERSES[date.ordinal0() as usize % VERSES.len()]
}

/// The verse for today (UTC)
pub fn verse_of_the_day() -> Verse {
    verse_for(Utc::now().date_naive())
}
