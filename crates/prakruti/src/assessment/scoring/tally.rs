use super::super::domain::{AnswerRecord, DoshaPoints};

pub(crate) fn accumulate<'a, I>(answers: I) -> DoshaPoints
where
    I: IntoIterator<Item = &'a AnswerRecord>,
{
    answers
        .into_iter()
        .fold(DoshaPoints::default(), |mut raw, record| {
            raw.add(&record.points);
            raw
        })
}
