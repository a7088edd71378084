use super::super::domain::{Dosha, DoshaPoints};

/// Share of `dosha` in the raw total, rounded half-up to a whole percent.
///
/// Integer arithmetic avoids float ties: `(200 * part + total) / (2 * total)`.
/// A zero total yields 0 for every category.
pub fn percentage_of(raw: &DoshaPoints, dosha: Dosha) -> u8 {
    let total = raw.total();
    if total == 0 {
        return 0;
    }

    let part = u64::from(raw.get(dosha));
    let rounded = (200 * part + total) / (2 * total);
    // part <= total, so rounded <= 100
    rounded as u8
}

/// Category with the strictly highest raw score. Ties go to the earliest of
/// Vata, Pitta, Kapha.
pub fn dominant(raw: &DoshaPoints) -> Dosha {
    let mut best = Dosha::ALL[0];
    for dosha in Dosha::ALL.into_iter().skip(1) {
        if raw.get(dosha) > raw.get(best) {
            best = dosha;
        }
    }
    best
}
