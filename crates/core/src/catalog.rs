//! Built-in starter curriculum.
//!
//! The content corpus ships with the binary; ids are stable because they
//! join against persisted completion records and must never be renamed once
//! users have progress against them.

use crate::error::Error;
use crate::library::ContentLibrary;
use crate::model::{LessonContent, LessonId, Module, ModuleId, QuickCheck, QuizOption, Section};

/// Returns the built-in personal-finance curriculum.
///
/// # Panics
///
/// Panics if the built-in content is malformed; that is a content-authoring
/// bug caught by the crate's tests, never a runtime state.
#[must_use]
pub fn starter_curriculum() -> ContentLibrary {
    build().expect("built-in curriculum should be well-formed")
}

fn build() -> Result<ContentLibrary, Error> {
    Ok(ContentLibrary::new(vec![
        budgeting_basics()?,
        saving_smart()?,
        credit_confidence()?,
    ])?)
}

fn budgeting_basics() -> Result<Module, Error> {
    let what_is_a_budget = LessonContent::new(
        LessonId::new("what-is-a-budget"),
        "What is a budget?",
        "A budget is a plan for where your money goes each month. Instead of \
         wondering where your paycheck went, you decide ahead of time how much \
         to spend, save, and share.",
        50,
    )?
    .with_tip("Track one week of spending before writing your first budget.")
    .with_quiz(QuickCheck::new(
        "What does a budget help you do?",
        vec![
            QuizOption::new("1", "Earn more money automatically", false),
            QuizOption::new("2", "Decide ahead of time where money goes", true),
            QuizOption::new("3", "Avoid paying taxes", false),
        ],
    )?);

    let needs_vs_wants = LessonContent::new(
        LessonId::new("needs-vs-wants"),
        "Needs vs. wants",
        "Needs keep you housed, fed, and able to work: rent, groceries, \
         utilities, transport. Wants make life nicer but are optional: eating \
         out, subscriptions, the newest phone. Sorting every expense into one \
         of the two columns is the first budgeting skill.",
        50,
    )?
    .with_section(Section::new(
        "Gray areas",
        "Some expenses are part need, part want. A phone is a need; the \
         latest model is a want. Budget the need, save for the want.",
    ))
    .with_quiz(QuickCheck::new(
        "Which expense belongs in the needs column?",
        vec![
            QuizOption::new("1", "Streaming subscriptions", false),
            QuizOption::new("2", "Concert tickets", false),
            QuizOption::new("3", "Rent", true),
        ],
    )?);

    let fifty_thirty_twenty = LessonContent::new(
        LessonId::new("fifty-thirty-twenty"),
        "The 50/30/20 rule",
        "A simple starting split for take-home pay: 50% to needs, 30% to \
         wants, 20% to saving and debt payoff. It is a guideline, not a law; \
         adjust the numbers to your situation, but keep all three buckets.",
        75,
    )?
    .with_section(Section::new(
        "Worked example",
        "On $2,000 take-home: $1,000 covers needs, $600 covers wants, and \
         $400 goes to savings or paying down debt.",
    ))
    .with_section(Section::new(
        "When rent is high",
        "If needs exceed 50%, shrink the wants bucket first and keep the \
         20% savings habit alive, even if the amount is small.",
    ))
    .with_tip("Automate the 20% on payday so it never reaches your spending account.")
    .with_quiz(QuickCheck::new(
        "Under 50/30/20, which bucket gets 20% of take-home pay?",
        vec![
            QuizOption::new("1", "Needs", false),
            QuizOption::new("2", "Wants", false),
            QuizOption::new("3", "Saving and debt payoff", true),
        ],
    )?);

    Ok(Module::new(
        ModuleId::new("budgeting-basics"),
        "Budgeting basics",
        Some("Plan where your money goes before it goes there.".into()),
        vec![what_is_a_budget, needs_vs_wants, fifty_thirty_twenty],
    )?)
}

fn saving_smart() -> Result<Module, Error> {
    let pay_yourself_first = LessonContent::new(
        LessonId::new("pay-yourself-first"),
        "Pay yourself first",
        "Saving what is left over usually means saving nothing. Flip the \
         order: move money to savings the moment you are paid, then live on \
         the rest.",
        50,
    )?
    .with_quiz(QuickCheck::new(
        "When should you move money into savings?",
        vec![
            QuizOption::new("1", "Right when you get paid", true),
            QuizOption::new("2", "At the end of the month, if anything is left", false),
        ],
    )?);

    let emergency_funds = LessonContent::new(
        LessonId::new("emergency-funds"),
        "Emergency funds",
        "An emergency fund is cash set aside for genuine surprises: a car \
         repair, a medical bill, a lost job. It keeps a bad week from turning \
         into debt. Start with one month of essential expenses; grow toward \
         three to six.",
        75,
    )?
    .with_section(Section::new(
        "Where to keep it",
        "Somewhere boring and instantly reachable: a separate high-yield \
         savings account, not investments and not cash under the mattress.",
    ))
    .with_tip("A $500 starter fund already covers most common emergencies.")
    .with_quiz(QuickCheck::new(
        "What is an emergency fund for?",
        vec![
            QuizOption::new("1", "Holiday shopping", false),
            QuizOption::new("2", "Genuine surprise expenses", true),
            QuizOption::new("3", "Buying stocks at a dip", false),
        ],
    )?);

    let goals_that_stick = LessonContent::new(
        LessonId::new("goals-that-stick"),
        "Savings goals that stick",
        "Vague goals fail. Give every goal an amount, a date, and a name — \
         \"$1,200 for a laptop by June\" beats \"save more\". Divide by the \
         months remaining and you have a monthly target you can automate.",
        75,
    )?
    .with_quiz(QuickCheck::new(
        "Which savings goal is most likely to stick?",
        vec![
            QuizOption::new("1", "Save more money someday", false),
            QuizOption::new("2", "$1,200 for a laptop by June", true),
            QuizOption::new("3", "Stop wasting money", false),
        ],
    )?);

    Ok(Module::new(
        ModuleId::new("saving-smart"),
        "Saving smart",
        Some("Build the habit before you need the money.".into()),
        vec![pay_yourself_first, emergency_funds, goals_that_stick],
    )?)
}

fn credit_confidence() -> Result<Module, Error> {
    let what_is_credit = LessonContent::new(
        LessonId::new("what-is-credit"),
        "What is credit?",
        "Credit is borrowed money you promise to repay, usually with \
         interest. Used well, it smooths big purchases and builds a record \
         lenders trust. Used badly, it quietly compounds against you.",
        50,
    )?
    .with_quiz(QuickCheck::new(
        "What is credit?",
        vec![
            QuizOption::new("1", "Free money from the bank", false),
            QuizOption::new("2", "Borrowed money you repay, usually with interest", true),
        ],
    )?);

    let credit_scores = LessonContent::new(
        LessonId::new("credit-scores"),
        "Credit scores",
        "A credit score summarizes how reliably you repay. Payment history \
         and utilization — how much of your available credit you actually \
         use — matter most. Paying on time, every time, is the single \
         biggest lever.",
        75,
    )?
    .with_section(Section::new(
        "Utilization",
        "Keeping balances under roughly 30% of your limits signals that you \
         borrow comfortably within your means.",
    ))
    .with_tip("Set every account to autopay at least the minimum.")
    .with_quiz(QuickCheck::new(
        "What influences a credit score the most?",
        vec![
            QuizOption::new("1", "Paying on time", true),
            QuizOption::new("2", "Your salary", false),
            QuizOption::new("3", "Where you shop", false),
        ],
    )?);

    let interest_and_apr = LessonContent::new(
        LessonId::new("interest-and-apr"),
        "Interest and APR",
        "APR is the yearly cost of borrowing, expressed as a percentage. On \
         a credit card, carrying a balance means that cost compounds: \
         interest is charged on interest. Paying the statement balance in \
         full every month makes your APR irrelevant.",
        100,
    )?
    .with_section(Section::new(
        "The minimum-payment trap",
        "Minimum payments mostly cover interest. A $1,000 balance at 24% \
         APR paid at the minimum can take years to clear.",
    ))
    .with_quiz(QuickCheck::new(
        "How do you avoid paying credit-card interest entirely?",
        vec![
            QuizOption::new("1", "Pay the minimum each month", false),
            QuizOption::new("2", "Pay the statement balance in full", true),
            QuizOption::new("3", "Use more than one card", false),
        ],
    )?);

    Ok(Module::new(
        ModuleId::new("credit-confidence"),
        "Credit confidence",
        Some("Make borrowed money work for you, not against you.".into()),
        vec![what_is_credit, credit_scores, interest_and_apr],
    )?)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_curriculum_is_well_formed() {
        let library = starter_curriculum();
        assert_eq!(library.len(), 3);
        for module in library.modules() {
            assert!(!module.is_empty());
        }
    }

    #[test]
    fn every_quiz_has_exactly_one_correct_option() {
        let library = starter_curriculum();
        for module in library.modules() {
            for lesson in module.lessons() {
                if let Some(quiz) = lesson.quiz() {
                    let correct = quiz.options().iter().filter(|o| o.correct).count();
                    assert_eq!(correct, 1, "lesson {} quiz", lesson.id());
                }
            }
        }
    }

    #[test]
    fn lessons_award_xp() {
        let library = starter_curriculum();
        for module in library.modules() {
            for lesson in module.lessons() {
                assert!(lesson.xp_reward() > 0, "lesson {}", lesson.id());
            }
        }
    }

    #[test]
    fn known_lesson_resolves_across_library() {
        let library = starter_curriculum();
        let (module, lesson) = library
            .find_lesson(&LessonId::new("emergency-funds"))
            .unwrap();
        assert_eq!(module.id(), &ModuleId::new("saving-smart"));
        assert_eq!(lesson.xp_reward(), 75);
    }
}
