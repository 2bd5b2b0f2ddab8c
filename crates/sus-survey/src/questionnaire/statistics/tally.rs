use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use super::super::domain::{DigitalProficiency, Gender, QuestionnaireRecord};
use super::buckets::{AgeGroup, ScoreBucket};
use super::views::{
    AgeGroupEntry, CategoryEntry, GenderEntry, GradeEntry, ProficiencyEntry, ScoreBucketEntry,
    SurveyStatistics, TrendEntry,
};
use crate::scoring::{
    interpret_clamped, Grade, InterpretationPolicy, ScoreCategory, MIN_SCORE,
};

/// Aggregates report the mean through the legacy table, clamped into range.
const SUMMARY_POLICY: InterpretationPolicy = InterpretationPolicy::Legacy;

#[derive(Debug, Default, Clone, Copy)]
struct Trend {
    count: usize,
    total: f64,
}

impl Trend {
    fn record(&mut self, score: f64) {
        self.count += 1;
        self.total += score;
    }

    fn to_entry(self, period: String) -> TrendEntry {
        TrendEntry {
            period,
            count: self.count,
            mean_score: mean(self.total, self.count),
        }
    }
}

#[derive(Debug, Default)]
struct StatisticsTally {
    scored: Trend,
    skipped: usize,
    deciles: HashMap<ScoreBucket, usize>,
    grades: HashMap<Grade, usize>,
    categories: HashMap<ScoreCategory, usize>,
    genders: HashMap<Gender, usize>,
    proficiency: HashMap<DigitalProficiency, usize>,
    ages: HashMap<AgeGroup, usize>,
    daily: BTreeMap<NaiveDate, Trend>,
    monthly: BTreeMap<(i32, u32), Trend>,
}

impl StatisticsTally {
    fn record(&mut self, record: &QuestionnaireRecord) {
        let Some(score) = record.effective_score() else {
            self.skipped += 1;
            return;
        };

        self.scored.record(score);
        *self.deciles.entry(ScoreBucket::from_score(score)).or_default() += 1;

        let grade = interpret_clamped(InterpretationPolicy::Standard, score).grade;
        *self.grades.entry(grade).or_default() += 1;
        *self
            .categories
            .entry(ScoreCategory::from_score(score))
            .or_default() += 1;

        let respondent = &record.respondent;
        *self.genders.entry(respondent.gender).or_default() += 1;
        *self
            .proficiency
            .entry(respondent.digital_proficiency)
            .or_default() += 1;
        *self
            .ages
            .entry(AgeGroup::from_age(respondent.age))
            .or_default() += 1;

        let day = record.created_at.date_naive();
        self.daily.entry(day).or_default().record(score);
        self.monthly
            .entry((day.year(), day.month()))
            .or_default()
            .record(score);
    }

    fn count<K: std::hash::Hash + Eq>(map: &HashMap<K, usize>, key: &K) -> usize {
        map.get(key).copied().unwrap_or(0)
    }

    fn summary(&self) -> SurveyStatistics {
        let mean_score = mean(self.scored.total, self.scored.count);

        let score_distribution = ScoreBucket::ordered()
            .map(|bucket| ScoreBucketEntry {
                bucket: bucket.label(),
                lower: bucket.lower(),
                upper: bucket.upper(),
                count: Self::count(&self.deciles, &bucket),
            })
            .collect();

        let grade_distribution = Grade::ordered()
            .into_iter()
            .map(|grade| GradeEntry {
                grade,
                grade_label: grade.label(),
                count: Self::count(&self.grades, &grade),
            })
            .collect();

        let category_distribution = ScoreCategory::ordered()
            .into_iter()
            .map(|category| CategoryEntry {
                category,
                category_label: category.label(),
                color: category.color(),
                count: Self::count(&self.categories, &category),
            })
            .collect();

        let gender_distribution = Gender::ordered()
            .into_iter()
            .map(|gender| GenderEntry {
                gender,
                gender_label: gender.label(),
                count: Self::count(&self.genders, &gender),
            })
            .collect();

        let proficiency_distribution = DigitalProficiency::ordered()
            .into_iter()
            .map(|proficiency| ProficiencyEntry {
                proficiency,
                proficiency_label: proficiency.label(),
                count: Self::count(&self.proficiency, &proficiency),
            })
            .collect();

        let age_distribution = AgeGroup::ordered()
            .into_iter()
            .map(|group| AgeGroupEntry {
                group,
                group_label: group.label(),
                count: Self::count(&self.ages, &group),
            })
            .collect();

        let daily_trend = self
            .daily
            .iter()
            .map(|(day, trend)| trend.to_entry(day.format("%Y-%m-%d").to_string()))
            .collect();

        let monthly_trend = self
            .monthly
            .iter()
            .map(|((year, month), trend)| trend.to_entry(format!("{year:04}-{month:02}")))
            .collect();

        SurveyStatistics {
            count: self.scored.count,
            skipped: self.skipped,
            mean_score,
            interpretation: interpret_clamped(SUMMARY_POLICY, mean_score),
            policy: SUMMARY_POLICY,
            score_distribution,
            grade_distribution,
            category_distribution,
            gender_distribution,
            proficiency_distribution,
            age_distribution,
            daily_trend,
            monthly_trend,
        }
    }
}

/// Mean rounded to two decimals; an empty population reads as 0.
fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        return MIN_SCORE;
    }
    let raw = total / count as f64;
    (raw * 100.0).round() / 100.0
}

impl SurveyStatistics {
    pub fn from_records(records: &[QuestionnaireRecord]) -> Self {
        let mut tally = StatisticsTally::default();
        for record in records {
            tally.record(record);
        }
        tally.summary()
    }
}
