//! Static tables: rank tiers, weekday workout plans, meal and posture checklists.

use chrono::Weekday;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RankTier {
    pub min_xp: u64,
    pub numeral: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub tooltip: &'static str,
    pub color: &'static str,
    pub shape: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WorkoutPlan {
    pub muscle: &'static str,
    pub exercises: &'static [&'static str],
    /// Joint loading session (jumps), flagged in the UI.
    pub high_impact: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
    pub detail: &'static str,
}

/// Ordered by strictly increasing `min_xp`.
pub const RANK_TIERS: &[RankTier] = &[
    RankTier {
        min_xp: 0,
        numeral: "I",
        name: "INITIATE",
        subtitle: "Initialization sequence active.",
        tooltip: "Entry recorded. No pattern established.",
        color: "#94a3b8",
        shape: "circle",
    },
    RankTier {
        min_xp: 40,
        numeral: "II",
        name: "CONSISTENT",
        subtitle: "Routine establishment detected.",
        tooltip: "Repeated action detected. Variability remains.",
        color: "#4ade80",
        shape: "hexagon",
    },
    RankTier {
        min_xp: 120,
        numeral: "III",
        name: "CONDITIONED",
        subtitle: "Automated behavioral pattern.",
        tooltip: "Action occurs with reduced resistance.",
        color: "#2dd4bf",
        shape: "hexagon",
    },
    RankTier {
        min_xp: 260,
        numeral: "IV",
        name: "FOCUSED",
        subtitle: "Resource allocation optimized.",
        tooltip: "Distractions show declining influence.",
        color: "#60a5fa",
        shape: "diamond",
    },
    RankTier {
        min_xp: 450,
        numeral: "V",
        name: "RELENTLESS",
        subtitle: "Negotiation protocols disabled.",
        tooltip: "Comfort avoidance observed. Negotiation absent.",
        color: "#f472b6",
        shape: "crest",
    },
    RankTier {
        min_xp: 700,
        numeral: "VI",
        name: "ELITE",
        subtitle: "External impact confirmed.",
        tooltip: "Performance maintained without reinforcement.",
        color: "#fbbf24",
        shape: "star",
    },
    RankTier {
        min_xp: 1000,
        numeral: "VII",
        name: "ASCENDED",
        subtitle: "Integration complete.",
        tooltip: "Behavior fully internalized. Monitoring reduced.",
        color: "#ffffff",
        shape: "crown",
    },
];

pub const MEALS: &[ChecklistItem] = &[
    ChecklistItem { id: "bf", label: "Breakfast", detail: "3 eggs, Oatmeal (60g), 2 bananas" },
    ChecklistItem { id: "sn", label: "Snack", detail: "Fruit / Peanuts / Curd" },
    ChecklistItem { id: "ln", label: "Lunch", detail: "Rice/Roti, Protein 100g, Dal, Salad" },
    ChecklistItem { id: "pr", label: "Pre-Work", detail: "Banana + Peanuts" },
    ChecklistItem { id: "po", label: "Post-Work", detail: "Milk / 2 Eggs" },
    ChecklistItem { id: "dn", label: "Dinner", detail: "Roti, Veg Curry, Protein" },
    ChecklistItem { id: "sl", label: "Sleep Ritual", detail: "Warm Milk + Turmeric" },
];

pub const POSTURE: &[ChecklistItem] = &[
    ChecklistItem { id: "h", label: "Dead Hang", detail: "" },
    ChecklistItem { id: "w", label: "Wall Hold", detail: "" },
    ChecklistItem { id: "c", label: "Cobra", detail: "" },
    ChecklistItem { id: "cc", label: "Cat-Cow", detail: "" },
    ChecklistItem { id: "cp", label: "Child's Pose", detail: "" },
];

const MONDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Chest / Triceps",
    exercises: &[
        "Push-ups: 3 × 12–15",
        "Incline Push-ups: 3 × 10–12",
        "Floor DB Fly: 3 × 12",
        "Close-grip Push-ups: 3 × 8–10",
        "Overhead DB Tricep Ext: 3 × 12",
    ],
    high_impact: false,
};

const TUESDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Back / Biceps",
    exercises: &[
        "Pull-ups / Door Rows: 3 × 6–10",
        "One-arm DB Row: 3 × 10",
        "DB RDL (light): 2 × 12",
        "DB Curl: 3 × 12",
        "Hammer Curl: 3 × 10–12",
    ],
    high_impact: false,
};

const WEDNESDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Legs / Abs / Impact",
    exercises: &[
        "Squats: 3 × 15",
        "Forward Lunges: 3 × 10",
        "Glute Bridges: 3 × 12",
        "Calf Raises: 3 × 20",
        "Plank: 3 × 30–45s",
        "Leg Raises: 3 × 12",
        "Masai Jumps: 3 × 12–15",
    ],
    high_impact: true,
};

const THURSDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Chest / Shoulders",
    exercises: &[
        "Decline Push-ups: 3 × 10",
        "Wide Push-ups: 3 × 12",
        "Standing DB Press: 3 × 10",
        "Lateral Raises: 3 × 12–15",
        "Front Raises: 3 × 12",
    ],
    high_impact: false,
};

const FRIDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Back / Biceps (Var)",
    exercises: &[
        "Towel Row / Band Pull: 3 × 12",
        "DB Reverse Fly: 3 × 12",
        "Superman Hold: 3 × 25s",
        "Concentration Curl: 3 × 10",
        "Reverse Curl: 3 × 12",
    ],
    high_impact: false,
};

const SATURDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Posture / Flow",
    exercises: &[
        "Hanging: 5 × 30s",
        "Wall Posture Hold: 5 × 5m",
        "Cobra Stretch: 3 × 30s",
        "Cat–Cow: 3 × 15",
        "Child’s Pose: 3 × 3m",
        "Masai Jumps: 4 × 15",
    ],
    high_impact: true,
};

const SUNDAY: WorkoutPlan = WorkoutPlan {
    muscle: "Active Recovery",
    exercises: &["Walk: 45 min", "Light Stretching: 15 min"],
    high_impact: false,
};

pub fn workout_plan(day: Weekday) -> &'static WorkoutPlan {
    match day {
        Weekday::Mon => &MONDAY,
        Weekday::Tue => &TUESDAY,
        Weekday::Wed => &WEDNESDAY,
        Weekday::Thu => &THURSDAY,
        Weekday::Fri => &FRIDAY,
        Weekday::Sat => &SATURDAY,
        Weekday::Sun => &SUNDAY,
    }
}

pub fn is_meal(id: &str) -> bool {
    MEALS.iter().any(|item| item.id == id)
}

pub fn is_posture(id: &str) -> bool {
    POSTURE.iter().any(|item| item.id == id)
}
