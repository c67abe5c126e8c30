use bloom_core::models::category::Category;

use crate::scoring::QuestionnaireItem;
use crate::Questionnaire;

/// SDQ: Strengths and Difficulties Questionnaire, parent-report form.
/// Four difficulty scales plus a prosocial strength scale, 5 items each.
/// Five positively phrased items on the difficulty scales are reverse scored.
pub struct Sdq;

impl Questionnaire for Sdq {
    fn id(&self) -> &str {
        "sdq"
    }

    fn name(&self) -> &str {
        "SDQ"
    }

    fn items(&self) -> &[QuestionnaireItem] {
        static ITEMS: std::sync::LazyLock<Vec<QuestionnaireItem>> =
            std::sync::LazyLock::new(|| {
                use Category::*;

                vec![
                    item(1, "My child is generally considerate of other people's feelings", Prosocial),
                    item(2, "My child is often restless and finds it hard to sit still for long", Hyperactivity),
                    item(3, "My child frequently mentions headaches, stomach aches or feeling sick", Emotional),
                    item(4, "My child likes to share with others (toys, snacks, etc.)", Prosocial),
                    item(5, "My child tends to lose their temper easily", Conduct),
                    item(6, "My child often prefers to play alone or keep to themselves", Peer),
                    reversed(7, "My child usually follows instructions and does what is requested", Conduct),
                    item(8, "My child seems to have many worries or often appears anxious", Emotional),
                    item(9, "My child is quick to help if someone else is hurt or upset", Prosocial),
                    item(10, "My child is constantly fidgeting or squirming", Hyperactivity),
                    reversed(11, "My child has at least one good friend they connect with", Peer),
                    item(12, "My child often gets into arguments or fights with other children", Conduct),
                    item(13, "My child often seems unhappy, downhearted, or tearful", Emotional),
                    reversed(14, "Other children generally like and enjoy being with my child", Peer),
                    item(15, "My child is easily distracted and finds it hard to stay focused", Hyperactivity),
                    item(16, "My child is nervous in new situations or easily loses confidence", Emotional),
                    item(17, "My child is kind and gentle with younger children", Prosocial),
                    item(18, "My child sometimes struggles with being honest or tries to cheat", Conduct),
                    item(19, "My child is sometimes picked on or treated unkindly by others", Peer),
                    item(20, "My child frequently offers to help out at home or school", Prosocial),
                    reversed(21, "My child usually thinks things through before acting", Hyperactivity),
                    item(22, "My child sometimes takes things that don't belong to them", Conduct),
                    item(23, "My child gets along better with adults than with other children", Peer),
                    item(24, "My child has many fears and is easily frightened", Emotional),
                    reversed(25, "My child finishes what they start and has a good attention span", Hyperactivity),
                ]
            });
        &ITEMS
    }
}

fn item(id: u32, text: &str, category: Category) -> QuestionnaireItem {
    QuestionnaireItem {
        id,
        text: text.to_string(),
        category,
        reverse: false,
    }
}

fn reversed(id: u32, text: &str, category: Category) -> QuestionnaireItem {
    QuestionnaireItem {
        reverse: true,
        ..item(id, text, category)
    }
}
