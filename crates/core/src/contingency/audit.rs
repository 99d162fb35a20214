use crate::contingency::{first_match, pad_unique, push_unique, Rule};
use crate::domain::audit::{
    ActionStep, AuditSubmission, TimeAuditReport, ACTION_STEP_COUNT, QUICK_WIN_TARGET,
    SIMPLE_WAY_TARGET, SOLUTION_TARGET,
};

const PRIORITY_STEPS: &[Rule<(&str, &str)>] = &[
    Rule {
        keywords: &["meeting"],
        output: (
            "Optimize Meeting Time",
            "Decline meetings without an agenda, default new invites to 25 minutes, and batch the ones you keep into two afternoons a week.",
        ),
    },
    Rule {
        keywords: &["email", "inbox"],
        output: (
            "Batch Your Email Processing",
            "Check email at three fixed times a day and close your inbox in between. Turn off new-mail alerts.",
        ),
    },
    Rule {
        keywords: &["social media"],
        output: (
            "Set Social Media Boundaries",
            "Move social apps off your home screen and block them during focus sessions.",
        ),
    },
    Rule {
        keywords: &["notification"],
        output: (
            "Silence Non-Essential Notifications",
            "Turn off every alert that is not from a person who needs you today, and use Do Not Disturb during deep work.",
        ),
    },
    Rule {
        keywords: &["interruption"],
        output: (
            "Protect Your Focus Hours",
            "Block two hours a day on your calendar, tell your team, and set your status to away while you work.",
        ),
    },
    Rule {
        keywords: &["procrastinat"],
        output: (
            "Beat Procrastination with Time Blocks",
            "Break the task you are avoiding into a 25-minute first step and start it before checking messages.",
        ),
    },
    Rule {
        keywords: &["multitask"],
        output: (
            "Commit to Single-Tasking",
            "Keep one task and one window open at a time. Write down anything else that comes up and return to it later.",
        ),
    },
    Rule {
        keywords: &["fatigue", "decision"],
        output: (
            "Reduce Daily Decisions",
            "Pick tomorrow's top three tasks the evening before and standardise recurring choices like meeting slots and meals.",
        ),
    },
    Rule {
        keywords: &["perfection"],
        output: (
            "Adopt a Good-Enough Standard",
            "Write down what done looks like before you start and ship the first version that meets it.",
        ),
    },
    Rule {
        keywords: &["overthink", "planning"],
        output: (
            "Timebox Your Planning",
            "Give planning a fixed 15-minute slot each morning, then act on the plan you have.",
        ),
    },
    Rule {
        keywords: &["late night"],
        output: (
            "Set a Hard Stop Time",
            "Pick a fixed end to your workday and note the next morning's first task before you stop.",
        ),
    },
];

const FOCUSED_WORK_SYSTEM: (&str, &str) = (
    "Create a Focused Work System",
    "Block your most important work into a daily focus session, keep a single prioritised task list, and review it at the end of each day.",
);

const SOLUTION_RULES: &[Rule<&str>] = &[
    Rule {
        keywords: &["meeting"],
        output: "Run meetings with a written agenda and a hard end time, and replace status meetings with a shared async update.",
    },
    Rule {
        keywords: &["email", "inbox"],
        output: "Process email in two or three scheduled batches and keep templates for common replies.",
    },
    Rule {
        keywords: &["social media"],
        output: "Lock social media with an app blocker during working hours and allow it only in scheduled breaks.",
    },
    Rule {
        keywords: &["notification"],
        output: "Bundle phone notifications into a scheduled summary and keep the phone out of reach during focus time.",
    },
    Rule {
        keywords: &["interruption"],
        output: "Set team office hours so colleagues know when you are available for questions.",
    },
    Rule {
        keywords: &["procrastinat"],
        output: "Use the two-minute rule: do anything that takes under two minutes now, and schedule the rest.",
    },
    Rule {
        keywords: &["multitask"],
        output: "Work in single-task blocks with one window open, and keep a scratch list for stray ideas.",
    },
    Rule {
        keywords: &["fatigue", "decision"],
        output: "Make your key decisions in the morning and template the recurring ones.",
    },
    Rule {
        keywords: &["perfection"],
        output: "Give each task a time budget and stop polishing when it runs out.",
    },
    Rule {
        keywords: &["overthink", "planning"],
        output: "Limit planning to a fixed daily slot and commit to the first reasonable plan.",
    },
    Rule {
        keywords: &["late night"],
        output: "Start a shutdown ritual at a fixed time each evening to protect your sleep and next-day focus.",
    },
];

const SOLUTION_DEFAULTS: &[&str] = &[
    "Use time blocking to give every important task a fixed slot on your calendar.",
    "Work in Pomodoro cycles: 25 minutes of focus followed by a 5-minute break.",
    "Plan tomorrow's top three priorities before you finish work today.",
    "Review your week every Friday to see where your time actually went.",
    "Group similar tasks together to cut the cost of switching context.",
];

const SOLUTION_LAST_RESORT: &str =
    "Delegate or automate one recurring task each week so you can focus on high-value work.";

// Personal habits and environmental factors share this table, so the
// ergonomics rule sits above the broader workspace rule.
const QUICK_WIN_RULES: &[Rule<&str>] = &[
    Rule {
        keywords: &["procrastinat"],
        output: "Start your hardest task first thing, for just 10 minutes.",
    },
    Rule {
        keywords: &["multitask"],
        output: "Close every tab and app you don't need for the task in front of you.",
    },
    Rule {
        keywords: &["late night"],
        output: "Set an alarm 30 minutes before bedtime to start winding down.",
    },
    Rule {
        keywords: &["perfection"],
        output: "Write 'good enough' criteria at the top of your next task before starting it.",
    },
    Rule {
        keywords: &["noise"],
        output: "Put on noise-cancelling headphones or a white-noise track for your next focus block.",
    },
    Rule {
        keywords: &["home"],
        output: "Agree on a do-not-disturb signal with the people you live with.",
    },
    Rule {
        keywords: &["interruption"],
        output: "Set a visible 'focus time' status for your next two hours.",
    },
    Rule {
        keywords: &["lighting", "light"],
        output: "Move your desk closer to a window or add a daylight lamp.",
    },
    Rule {
        keywords: &["temperature"],
        output: "Adjust the thermostat or add a fan so you stay comfortable while you work.",
    },
    Rule {
        keywords: &["ergonomic"],
        output: "Raise your screen to eye level and check your chair height.",
    },
    Rule {
        keywords: &["workspace"],
        output: "Clear your desk of everything today's work doesn't need.",
    },
    Rule {
        keywords: &["equipment"],
        output: "List the equipment problems slowing you down and fix the cheapest one today.",
    },
    Rule {
        keywords: &["internet", "connectivity", "wifi"],
        output: "Restart your router and keep a phone hotspot ready as a backup connection.",
    },
    Rule {
        keywords: &["software"],
        output: "Update or restart the tools that keep failing before your next work session.",
    },
    Rule {
        keywords: &["time zone"],
        output: "Add a world clock for your collaborators' time zones to your calendar.",
    },
];

const QUICK_WIN_DEFAULTS: &[&str] = &[
    "Turn off non-essential notifications for the rest of the day.",
    "Write down your top three tasks before opening email.",
    "Take a five-minute walk between long work sessions.",
    "Tidy your desk before you finish for the day.",
];

const QUICK_WIN_LAST_RESORT: &str =
    "Keep a glass of water on your desk and finish it at every break to stay alert.";

const SIMPLE_WAY_RULES: &[Rule<&str>] = &[
    Rule {
        keywords: &["noise"],
        output: "Create a quiet zone with headphones, or move to a quieter room for focus hours.",
    },
    Rule {
        keywords: &["home"],
        output: "Set up a dedicated work area at home that you only use for work.",
    },
    Rule {
        keywords: &["interruption"],
        output: "Book a meeting room or a quiet corner for deep-work sessions.",
    },
    Rule {
        keywords: &["lighting", "light"],
        output: "Use warm, indirect lighting to reduce eye strain through the day.",
    },
    Rule {
        keywords: &["temperature"],
        output: "Keep your workspace at a steady, comfortable temperature with a small fan or heater.",
    },
    Rule {
        keywords: &["ergonomic"],
        output: "Set up your chair, desk and screen so your feet rest flat and your eyes meet the top of the screen.",
    },
    Rule {
        keywords: &["workspace"],
        output: "Claim a consistent workspace, even a small one, and keep it ready for work.",
    },
    Rule {
        keywords: &["equipment"],
        output: "Keep a short checklist of equipment to test before important calls.",
    },
    Rule {
        keywords: &["internet", "connectivity", "wifi"],
        output: "Use a wired connection for calls and large uploads.",
    },
    Rule {
        keywords: &["software"],
        output: "Keep your core tools updated and remove the ones you no longer use.",
    },
    Rule {
        keywords: &["time zone"],
        output: "Agree shared overlap hours with collaborators in other time zones.",
    },
];

const SIMPLE_WAY_DEFAULTS: &[&str] = &[
    "Keep only the items you need for today's work on your desk.",
    "Use a single digital task list instead of scattered notes.",
    "Put focus blocks on your calendar so others can see them.",
    "Leave your phone in another room during deep work.",
];

const SIMPLE_WAY_LAST_RESORT: &str =
    "Colour-code your calendar by type of work so you can see how your week is balanced.";

/// Builds the substitute report from the submission alone. Never fails, and
/// always meets the section counts the model is asked for.
pub fn time_audit_contingency(submission: &AuditSubmission) -> TimeAuditReport {
    TimeAuditReport {
        action_steps: action_steps(submission),
        solutions: solutions(submission),
        quick_wins: quick_wins(submission),
        simple_ways: simple_ways(submission),
    }
}

fn action_steps(submission: &AuditSubmission) -> Vec<ActionStep> {
    let mut steps: Vec<ActionStep> = submission
        .priorities()
        .iter()
        .take(ACTION_STEP_COUNT)
        .map(|priority| match first_match(PRIORITY_STEPS, priority) {
            Some((title, description)) => ActionStep::new(*title, *description),
            None => priority_step(priority),
        })
        .collect();

    while steps.len() < ACTION_STEP_COUNT {
        let (title, description) = FOCUSED_WORK_SYSTEM;
        steps.push(ActionStep::new(title, description));
    }
    steps
}

fn priority_step(priority: &str) -> ActionStep {
    ActionStep::new(
        format!("Tackle {priority}"),
        format!(
            "Note each time {priority} costs you time this week, then set one specific rule to limit it and check the result on Friday."
        ),
    )
}

fn solutions(submission: &AuditSubmission) -> Vec<String> {
    let inputs = submission.time_wasters.iter().take(SOLUTION_TARGET);
    let mut out = matched(SOLUTION_RULES, inputs);
    pad_unique(&mut out, SOLUTION_TARGET, SOLUTION_DEFAULTS, SOLUTION_LAST_RESORT);
    out
}

fn quick_wins(submission: &AuditSubmission) -> Vec<String> {
    let inputs = submission
        .personal_habits
        .iter()
        .chain(&submission.environmental_factors)
        .take(QUICK_WIN_TARGET);
    let mut out = matched(QUICK_WIN_RULES, inputs);
    pad_unique(&mut out, QUICK_WIN_TARGET, QUICK_WIN_DEFAULTS, QUICK_WIN_LAST_RESORT);
    out
}

fn simple_ways(submission: &AuditSubmission) -> Vec<String> {
    let inputs = submission
        .environmental_factors
        .iter()
        .take(SIMPLE_WAY_TARGET);
    let mut out = matched(SIMPLE_WAY_RULES, inputs);
    pad_unique(&mut out, SIMPLE_WAY_TARGET, SIMPLE_WAY_DEFAULTS, SIMPLE_WAY_LAST_RESORT);
    out
}

fn matched<'a>(
    rules: &[Rule<&'static str>],
    inputs: impl Iterator<Item = &'a String>,
) -> Vec<String> {
    let mut out = Vec::new();
    for input in inputs {
        if let Some(text) = first_match(rules, input) {
            push_unique(&mut out, text);
        }
    }
    out
}
