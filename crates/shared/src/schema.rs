use crate::domain::{Sector, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Select,
    Date,
    Number,
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Allowed values for `Select` fields; empty otherwise.
    pub options: &'static [&'static str],
}

const fn field(id: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind,
        options: &[],
    }
}

const fn select(
    id: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind: FieldKind::Select,
        options,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub number: u8,
    pub title: &'static str,
    pub duration: &'static str,
    pub required: &'static [&'static str],
    pub fields: &'static [FieldSpec],
}

const EXPERIENCE_LEVELS: &[&str] = &["none", "limited", "moderate", "extensive"];
const AVAILABILITY: &[&str] = &["not-available", "partial", "available"];

static STEPS: [StepSpec; 6] = [
    StepSpec {
        number: 1,
        title: "Scene Setting",
        duration: "2 weeks",
        required: &["team-lead", "institutional-arrangements"],
        fields: &[
            field("team-lead", "BTR Team Lead", FieldKind::Text),
            field(
                "institutional-arrangements",
                "Institutional Arrangements",
                FieldKind::TextArea,
            ),
            field("stakeholders", "Key Stakeholders", FieldKind::TextArea),
            field("kickoff-date", "Kick-off Date", FieldKind::Date),
        ],
    },
    StepSpec {
        number: 2,
        title: "Taking Stock",
        duration: "3 weeks",
        required: &["ghg-experience"],
        fields: &[
            select("ghg-experience", "GHG Inventory Experience", EXPERIENCE_LEVELS),
            select("data-afolu", "Data Availability (AFOLU)", AVAILABILITY),
            select("data-energy", "Data Availability (Energy)", AVAILABILITY),
            select("data-waste", "Data Availability (Waste)", AVAILABILITY),
            select("data-ipuu", "Data Availability (IPUU)", AVAILABILITY),
            field("capacity-gaps", "Capacity Gaps", FieldKind::TextArea),
        ],
    },
    StepSpec {
        number: 3,
        title: "Planning",
        duration: "2 weeks",
        required: &[],
        fields: &[
            field("work-plan", "Work Plan", FieldKind::TextArea),
            field("budget", "Budget (USD)", FieldKind::Number),
            field("planning-start", "Planned Start", FieldKind::Date),
        ],
    },
    StepSpec {
        number: 4,
        title: "Implementation",
        duration: "4 months",
        required: &[],
        fields: &[
            select(
                "inventory-status",
                "GHG Inventory Status",
                &["not-started", "in-progress", "complete"],
            ),
            field("mitigation-tracking", "Mitigation Tracking", FieldKind::TextArea),
            field("support-received", "Support Received", FieldKind::TextArea),
        ],
    },
    StepSpec {
        number: 5,
        title: "TER Preparation",
        duration: "1 month",
        required: &[],
        fields: &[
            field("ter-contact", "TER Focal Point", FieldKind::Text),
            field("ter-documents", "Supporting Documents", FieldKind::TextArea),
        ],
    },
    StepSpec {
        number: 6,
        title: "Continuous Improvement",
        duration: "Ongoing",
        required: &[],
        fields: &[
            field("lessons-learned", "Lessons Learned", FieldKind::TextArea),
            field("improvement-plan", "Improvement Plan", FieldKind::TextArea),
        ],
    },
];

const AFOLU_FIELDS: &[FieldSpec] = &[
    field("afolu-year", "Inventory Year", FieldKind::Number),
    field("afolu-land-use", "Land Use Change (ha)", FieldKind::Number),
    field("afolu-livestock", "Livestock Population", FieldKind::Number),
];

const ENERGY_FIELDS: &[FieldSpec] = &[
    field("energy-year", "Inventory Year", FieldKind::Number),
    field("energy-consumption", "Fuel Consumption (TJ)", FieldKind::Number),
    field("energy-emissions", "Emissions (Gg CO2e)", FieldKind::Number),
];

const WASTE_FIELDS: &[FieldSpec] = &[
    field("waste-year", "Inventory Year", FieldKind::Number),
    field("waste-generated", "Waste Generated (t)", FieldKind::Number),
    field("waste-treatment", "Treatment Method", FieldKind::Text),
];

const IPUU_FIELDS: &[FieldSpec] = &[
    field("ipuu-year", "Inventory Year", FieldKind::Number),
    field("ipuu-production", "Industrial Production (t)", FieldKind::Number),
    field("ipuu-emissions", "Emissions (Gg CO2e)", FieldKind::Number),
];

pub fn step_spec(step: Step) -> &'static StepSpec {
    &STEPS[usize::from(step.number() - 1)]
}

pub fn required_fields(step: Step) -> &'static [&'static str] {
    step_spec(step).required
}

pub fn sector_fields(sector: Sector) -> &'static [FieldSpec] {
    match sector {
        Sector::Afolu => AFOLU_FIELDS,
        Sector::Energy => ENERGY_FIELDS,
        Sector::Waste => WASTE_FIELDS,
        Sector::Ipuu => IPUU_FIELDS,
    }
}

pub fn is_known_step_field(step: Step, id: &str) -> bool {
    step_spec(step).fields.iter().any(|spec| spec.id == id)
}

pub fn is_known_sector_field(sector: Sector, id: &str) -> bool {
    sector_fields(sector).iter().any(|spec| spec.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_match_first_two_steps_only() {
        let step = |n| Step::new(n).expect("step");
        assert_eq!(
            required_fields(step(1)),
            &["team-lead", "institutional-arrangements"]
        );
        assert_eq!(required_fields(step(2)), &["ghg-experience"]);
        for n in 3..=6 {
            assert!(required_fields(step(n)).is_empty());
        }
    }

    #[test]
    fn required_fields_are_part_of_their_step_form() {
        for step in Step::all() {
            for id in required_fields(step) {
                assert!(is_known_step_field(step, id), "{id} missing from step {step}");
            }
        }
    }

    #[test]
    fn sector_field_ids_carry_sector_prefix() {
        for sector in Sector::ALL {
            for spec in sector_fields(sector) {
                assert!(spec.id.starts_with(sector.id()));
            }
        }
    }
}
