//! Column Schema Module
//! Fixed set of PUF columns the report reads, keyed by their sheet labels.

use serde::Serialize;

/// Primary columns of interest, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    State,
    People,
    PeopleFfs,
    AgeUnder40,
    Age40To64,
    Age65To84,
    Age85Plus,
    Female,
    Male,
    NonHispanicWhite,
    AfricanAmerican,
    Hispanic,
    AsianPacificIslander,
    AmericanIndianAlaskaNative,
    OtherUnknownRace,
    MasCashOrSection1931,
    MasMedicallyNeedy,
    MasPovertyRelated,
    Mas1115Expansion,
    MasUnclassified,
}

impl Column {
    pub const ALL: [Column; 20] = [
        Column::State,
        Column::People,
        Column::PeopleFfs,
        Column::AgeUnder40,
        Column::Age40To64,
        Column::Age65To84,
        Column::Age85Plus,
        Column::Female,
        Column::Male,
        Column::NonHispanicWhite,
        Column::AfricanAmerican,
        Column::Hispanic,
        Column::AsianPacificIslander,
        Column::AmericanIndianAlaskaNative,
        Column::OtherUnknownRace,
        Column::MasCashOrSection1931,
        Column::MasMedicallyNeedy,
        Column::MasPovertyRelated,
        Column::Mas1115Expansion,
        Column::MasUnclassified,
    ];

    /// Columns averaged per state in the summary reduction.
    pub const SUMMARY_MEANS: [Column; 12] = [
        Column::AgeUnder40,
        Column::Age40To64,
        Column::Age65To84,
        Column::Age85Plus,
        Column::Female,
        Column::Male,
        Column::NonHispanicWhite,
        Column::AfricanAmerican,
        Column::Hispanic,
        Column::AsianPacificIslander,
        Column::AmericanIndianAlaskaNative,
        Column::OtherUnknownRace,
    ];

    /// Header label as it appears in the workbook (after trimming).
    pub fn label(self) -> &'static str {
        match self {
            Column::State => "State",
            Column::People => "Number of People",
            Column::PeopleFfs => "Number of People with FFS",
            Column::AgeUnder40 => "Percent under 40 Years",
            Column::Age40To64 => "Percent between 40-64 Years",
            Column::Age65To84 => "Percent between 65-84 Years",
            Column::Age85Plus => "Percent 85+ Years",
            Column::Female => "Percent Female",
            Column::Male => "Percent Male",
            Column::NonHispanicWhite => RaceColumn::NonHispanicWhite.label(),
            Column::AfricanAmerican => RaceColumn::AfricanAmerican.label(),
            Column::Hispanic => RaceColumn::Hispanic.label(),
            Column::AsianPacificIslander => RaceColumn::AsianPacificIslander.label(),
            Column::AmericanIndianAlaskaNative => RaceColumn::AmericanIndianAlaskaNative.label(),
            Column::OtherUnknownRace => RaceColumn::OtherUnknownRace.label(),
            Column::MasCashOrSection1931 => {
                "Percent of Medicaid enrollees with MAS - Receiving Cash or Section 1931"
            }
            Column::MasMedicallyNeedy => "Percent of Medicaid enrollees with MAS - Medically Needy",
            Column::MasPovertyRelated => "Percent of Medicaid enrollees with MAS - Poverty Related",
            Column::Mas1115Expansion => {
                "Percent of Medicaid enrollees with MAS - 1115 Demonstration Expansion"
            }
            Column::MasUnclassified => {
                "Percent of Medicaid enrollees with MAS - unclassified or unknown"
            }
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Column::State
    }
}

/// Race percentage columns tracked across yearly sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RaceColumn {
    NonHispanicWhite,
    AfricanAmerican,
    Hispanic,
    AsianPacificIslander,
    AmericanIndianAlaskaNative,
    OtherUnknownRace,
}

impl RaceColumn {
    pub const ALL: [RaceColumn; 6] = [
        RaceColumn::NonHispanicWhite,
        RaceColumn::AfricanAmerican,
        RaceColumn::Hispanic,
        RaceColumn::AsianPacificIslander,
        RaceColumn::AmericanIndianAlaskaNative,
        RaceColumn::OtherUnknownRace,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RaceColumn::NonHispanicWhite => "Percent Non-Hispanic White",
            RaceColumn::AfricanAmerican => "Percent African American",
            RaceColumn::Hispanic => "Percent Hispanic",
            RaceColumn::AsianPacificIslander => "Percent Asian or Pacific Islander",
            RaceColumn::AmericanIndianAlaskaNative => "Percent American Indian or Alaska Native",
            RaceColumn::OtherUnknownRace => "Percent Other or Unknown Race",
        }
    }

    /// Short name used for chart legends.
    pub fn display_name(self) -> &'static str {
        self.label().trim_start_matches("Percent ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<&str> = Column::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), Column::ALL.len());
    }

    #[test]
    fn summary_means_are_numeric_columns() {
        assert!(Column::SUMMARY_MEANS.iter().all(|c| c.is_numeric()));
    }

    #[test]
    fn race_display_names_drop_prefix() {
        assert_eq!(RaceColumn::Hispanic.display_name(), "Hispanic");
        assert_eq!(
            RaceColumn::AsianPacificIslander.display_name(),
            "Asian or Pacific Islander"
        );
    }
}
