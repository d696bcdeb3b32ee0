//! Record shapes shared by the format checks and the id normalization.
//!
//! Every list-of-records section of an instance or a solution document is
//! described once here: the key it lives under, how its records are indexed
//! and which fields a record carries.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer >= 1.
    Id,
    /// Any finite number.
    Number,
    /// Object with numeric `x` and `y`.
    Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keying {
    /// One entry per record, keyed by the named field.
    Single(&'static str),
    /// Two directed entries per record, one under each endpoint. The entry
    /// stored under `from` keeps the other endpoint in `to`.
    Symmetric {
        from: &'static str,
        to: &'static str,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordShape {
    pub section: &'static str,
    pub aliases: &'static [&'static str],
    /// Singular name used in messages.
    pub record: &'static str,
    pub keying: Keying,
    pub fields: &'static [FieldSpec],
    /// Solution records must carry exactly `fields`; instance records may
    /// carry more.
    pub strict: bool,
}

impl RecordShape {
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn matches_section(&self, key: &str) -> bool {
        self.section == key || self.aliases.contains(&key)
    }
}

pub const ID: &str = "id";
pub const SUBSTATION_ID: &str = "substation_id";
pub const OTHER_SUBSTATION_ID: &str = "other_substation_id";

pub const SUBSTATIONS: RecordShape = RecordShape {
    section: "substations",
    aliases: &[],
    record: "substation",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("substation_type", FieldKind::Id),
        field("land_cable_type", FieldKind::Id),
    ],
    strict: true,
};

pub const TURBINES: RecordShape = RecordShape {
    section: "turbines",
    aliases: &[],
    record: "turbine",
    keying: Keying::Single(ID),
    fields: &[field(ID, FieldKind::Id), field(SUBSTATION_ID, FieldKind::Id)],
    strict: true,
};

pub const SUBSTATION_SUBSTATION_CABLES: RecordShape = RecordShape {
    section: "substation_substation_cables",
    aliases: &[],
    record: "substation-substation cable",
    keying: Keying::Symmetric {
        from: SUBSTATION_ID,
        to: OTHER_SUBSTATION_ID,
    },
    fields: &[
        field(SUBSTATION_ID, FieldKind::Id),
        field(OTHER_SUBSTATION_ID, FieldKind::Id),
        field("cable_type", FieldKind::Id),
    ],
    strict: true,
};

pub const SOLUTION_SHAPES: [RecordShape; 3] =
    [SUBSTATIONS, TURBINES, SUBSTATION_SUBSTATION_CABLES];

pub const GENERAL_PARAMETERS: &str = "general_parameters";

pub const SUBSTATION_TYPES: RecordShape = RecordShape {
    section: "substation_types",
    aliases: &[],
    record: "substation type",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("cost", FieldKind::Number),
        field("rating", FieldKind::Number),
        field("probability_of_failure", FieldKind::Number),
    ],
    strict: false,
};

pub const LAND_SUBSTATION_CABLE_TYPES: RecordShape = RecordShape {
    section: "land_substation_cable_types",
    aliases: &[],
    record: "land-substation cable type",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("fixed_cost", FieldKind::Number),
        field("variable_cost", FieldKind::Number),
        field("rating", FieldKind::Number),
        field("probability_of_failure", FieldKind::Number),
    ],
    strict: false,
};

pub const SUBSTATION_SUBSTATION_CABLE_TYPES: RecordShape = RecordShape {
    section: "substation_substation_cable_types",
    aliases: &[],
    record: "substation-substation cable type",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("fixed_cost", FieldKind::Number),
        field("variable_cost", FieldKind::Number),
        field("rating", FieldKind::Number),
        optional("probability_of_failure", FieldKind::Number),
    ],
    strict: false,
};

pub const SUBSTATION_LOCATIONS: RecordShape = RecordShape {
    section: "substation_locations",
    aliases: &[],
    record: "substation location",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("x", FieldKind::Number),
        field("y", FieldKind::Number),
    ],
    strict: false,
};

pub const WIND_TURBINES: RecordShape = RecordShape {
    section: "wind_turbines",
    aliases: &[],
    record: "wind turbine",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("x", FieldKind::Number),
        field("y", FieldKind::Number),
    ],
    strict: false,
};

pub const WIND_SCENARIOS: RecordShape = RecordShape {
    section: "wind_scenarios",
    aliases: &["wind_scenario"],
    record: "wind scenario",
    keying: Keying::Single(ID),
    fields: &[
        field(ID, FieldKind::Id),
        field("probability", FieldKind::Number),
        field("power_generation", FieldKind::Number),
    ],
    strict: false,
};

pub const INSTANCE_SHAPES: [RecordShape; 6] = [
    SUBSTATION_TYPES,
    LAND_SUBSTATION_CABLE_TYPES,
    SUBSTATION_SUBSTATION_CABLE_TYPES,
    SUBSTATION_LOCATIONS,
    WIND_TURBINES,
    WIND_SCENARIOS,
];

/// Fields of `general_parameters`. The main land station also answers to
/// its historical misspelling.
pub const GENERAL_PARAMETER_FIELDS: &[FieldSpec] = &[
    field("maximum_power", FieldKind::Number),
    field("curtailing_cost", FieldKind::Number),
    field("curtailing_penalty", FieldKind::Number),
    field("maximum_curtailing", FieldKind::Number),
    field("fixed_cost_cable", FieldKind::Number),
    field("variable_cost_cable", FieldKind::Number),
    field("main_land_station", FieldKind::Position),
];

pub const MAIN_LAND_STATION_ALIASES: &[&str] = &["main_land_sation"];
