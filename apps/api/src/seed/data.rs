use chrono::NaiveDate;

use crate::models::staff::{AvailabilityStatus, OneOnOneStatus};

/// Level recorded for every demo skill link.
pub const DEMO_SKILL_LEVEL: i32 = 3;
/// Cap on per-skill years for demo links.
pub const DEMO_SKILL_YEARS_CAP: i32 = 3;

pub struct DemoSkill {
    pub name: &'static str,
    pub category: &'static str,
}

pub struct DemoEmployee {
    pub name: &'static str,
    pub main_role: &'static str,
    pub years_experience: i32,
    pub unit_price_min: i32,
    pub unit_price_max: i32,
    pub skills: &'static [&'static str],
}

/// `employee` is an index into [`EMPLOYEES`].
pub struct DemoAvailability {
    pub employee: usize,
    pub status: AvailabilityStatus,
}

pub struct DemoOneOnOne {
    pub employee: usize,
    pub date: (i32, u32, u32),
    pub status: OneOnOneStatus,
    pub memo: &'static str,
}

impl DemoOneOnOne {
    pub fn date(&self) -> Option<NaiveDate> {
        let (y, m, d) = self.date;
        NaiveDate::from_ymd_opt(y, m, d)
    }
}

impl DemoEmployee {
    pub fn skill_years(&self) -> i32 {
        self.years_experience.min(DEMO_SKILL_YEARS_CAP)
    }
}

const FRONTEND: &str = "フロントエンド";
const BACKEND: &str = "バックエンド";
const DATABASE: &str = "データベース";
const INFRA: &str = "インフラ";
const OTHER: &str = "その他";

pub const SKILLS: &[DemoSkill] = &[
    DemoSkill { name: "React", category: FRONTEND },
    DemoSkill { name: "Vue.js", category: FRONTEND },
    DemoSkill { name: "Angular", category: FRONTEND },
    DemoSkill { name: "TypeScript", category: FRONTEND },
    DemoSkill { name: "JavaScript", category: FRONTEND },
    DemoSkill { name: "Python", category: BACKEND },
    DemoSkill { name: "Java", category: BACKEND },
    DemoSkill { name: "C#", category: BACKEND },
    DemoSkill { name: "Node.js", category: BACKEND },
    DemoSkill { name: "PHP", category: BACKEND },
    DemoSkill { name: "Ruby", category: BACKEND },
    DemoSkill { name: "PostgreSQL", category: DATABASE },
    DemoSkill { name: "MySQL", category: DATABASE },
    DemoSkill { name: "MongoDB", category: DATABASE },
    DemoSkill { name: "Redis", category: DATABASE },
    DemoSkill { name: "AWS", category: INFRA },
    DemoSkill { name: "Docker", category: INFRA },
    DemoSkill { name: "Kubernetes", category: INFRA },
    DemoSkill { name: "Terraform", category: INFRA },
    DemoSkill { name: "Git", category: OTHER },
    DemoSkill { name: "Figma", category: OTHER },
    DemoSkill { name: "Slack", category: OTHER },
];

pub const EMPLOYEES: &[DemoEmployee] = &[
    DemoEmployee {
        name: "田中太郎",
        main_role: "フロントエンドエンジニア",
        years_experience: 5,
        unit_price_min: 600_000,
        unit_price_max: 800_000,
        skills: &["React", "TypeScript", "JavaScript", "AWS"],
    },
    DemoEmployee {
        name: "佐藤花子",
        main_role: "バックエンドエンジニア",
        years_experience: 7,
        unit_price_min: 700_000,
        unit_price_max: 900_000,
        skills: &["Python", "PostgreSQL", "Docker", "AWS"],
    },
    DemoEmployee {
        name: "鈴木一郎",
        main_role: "フルスタックエンジニア",
        years_experience: 3,
        unit_price_min: 500_000,
        unit_price_max: 700_000,
        skills: &["Vue.js", "Node.js", "MySQL", "Git"],
    },
    DemoEmployee {
        name: "高橋美咲",
        main_role: "インフラエンジニア",
        years_experience: 6,
        unit_price_min: 650_000,
        unit_price_max: 850_000,
        skills: &["AWS", "Docker", "Kubernetes", "Terraform"],
    },
    DemoEmployee {
        name: "伊藤健太",
        main_role: "バックエンドエンジニア",
        years_experience: 4,
        unit_price_min: 550_000,
        unit_price_max: 750_000,
        skills: &["Java", "PostgreSQL", "Redis", "Git"],
    },
    DemoEmployee {
        name: "渡辺由美",
        main_role: "フロントエンドエンジニア",
        years_experience: 2,
        unit_price_min: 450_000,
        unit_price_max: 600_000,
        skills: &["Angular", "TypeScript", "Figma"],
    },
    DemoEmployee {
        name: "山田慎也",
        main_role: "フルスタックエンジニア",
        years_experience: 8,
        unit_price_min: 800_000,
        unit_price_max: 1_000_000,
        skills: &["React", "Python", "PostgreSQL", "AWS", "Docker"],
    },
    DemoEmployee {
        name: "中村麻衣",
        main_role: "バックエンドエンジニア",
        years_experience: 5,
        unit_price_min: 600_000,
        unit_price_max: 800_000,
        skills: &["C#", "MongoDB", "Redis"],
    },
    DemoEmployee {
        name: "小林拓也",
        main_role: "フロントエンドエンジニア",
        years_experience: 3,
        unit_price_min: 500_000,
        unit_price_max: 650_000,
        skills: &["Vue.js", "JavaScript", "Figma"],
    },
    DemoEmployee {
        name: "加藤理恵",
        main_role: "インフラエンジニア",
        years_experience: 4,
        unit_price_min: 550_000,
        unit_price_max: 750_000,
        skills: &["AWS", "Docker", "Git"],
    },
];

pub const AVAILABILITY: &[DemoAvailability] = &[
    DemoAvailability { employee: 0, status: AvailabilityStatus::Working },
    DemoAvailability { employee: 1, status: AvailabilityStatus::AvailableNextMonth },
    DemoAvailability { employee: 2, status: AvailabilityStatus::ImmediatelyAvailable },
    DemoAvailability { employee: 3, status: AvailabilityStatus::Working },
    DemoAvailability { employee: 4, status: AvailabilityStatus::AvailableNextMonth },
    DemoAvailability { employee: 5, status: AvailabilityStatus::ImmediatelyAvailable },
    DemoAvailability { employee: 6, status: AvailabilityStatus::Working },
    DemoAvailability { employee: 7, status: AvailabilityStatus::AvailableNextMonth },
];

pub const ONE_ON_ONES: &[DemoOneOnOne] = &[
    DemoOneOnOne {
        employee: 0,
        date: (2025, 9, 15),
        status: OneOnOneStatus::Good,
        memo: "順調にプロジェクトを進めている",
    },
    DemoOneOnOne {
        employee: 1,
        date: (2025, 9, 18),
        status: OneOnOneStatus::Attention,
        memo: "技術的な課題で悩んでいる様子",
    },
    DemoOneOnOne {
        employee: 2,
        date: (2025, 9, 20),
        status: OneOnOneStatus::Normal,
        memo: "特に問題なし",
    },
    DemoOneOnOne {
        employee: 3,
        date: (2025, 9, 22),
        status: OneOnOneStatus::Good,
        memo: "新しい技術の習得に意欲的",
    },
    DemoOneOnOne {
        employee: 0,
        date: (2025, 8, 15),
        status: OneOnOneStatus::Normal,
        memo: "前回の課題は解決済み",
    },
    DemoOneOnOne {
        employee: 1,
        date: (2025, 8, 18),
        status: OneOnOneStatus::Good,
        memo: "技術的な課題を克服し成長している",
    },
    DemoOneOnOne {
        employee: 4,
        date: (2025, 9, 25),
        status: OneOnOneStatus::Attention,
        memo: "モチベーション低下気味",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dataset_shape() {
        assert_eq!(SKILLS.len(), 22);
        assert_eq!(EMPLOYEES.len(), 10);
        assert_eq!(AVAILABILITY.len(), 8);
        assert_eq!(ONE_ON_ONES.len(), 7);

        let categories: HashSet<&str> = SKILLS.iter().map(|s| s.category).collect();
        assert_eq!(categories.len(), 5);
    }

    #[test]
    fn test_skill_names_unique_and_every_link_resolves() {
        let names: HashSet<&str> = SKILLS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SKILLS.len());

        for employee in EMPLOYEES {
            for skill in employee.skills {
                assert!(names.contains(skill), "{} links unknown skill {skill}", employee.name);
            }
        }
    }

    #[test]
    fn test_references_point_at_real_employees() {
        assert!(AVAILABILITY.iter().all(|a| a.employee < EMPLOYEES.len()));
        assert!(ONE_ON_ONES.iter().all(|o| o.employee < EMPLOYEES.len()));

        let with_availability: HashSet<usize> = AVAILABILITY.iter().map(|a| a.employee).collect();
        assert_eq!(with_availability.len(), AVAILABILITY.len());
    }

    #[test]
    fn test_one_on_one_dates_are_valid() {
        assert!(ONE_ON_ONES.iter().all(|o| o.date().is_some()));
    }

    #[test]
    fn test_price_ranges_are_ordered() {
        assert!(EMPLOYEES.iter().all(|e| e.unit_price_min <= e.unit_price_max));
    }

    #[test]
    fn test_skill_years_capped() {
        assert_eq!(EMPLOYEES[1].skill_years(), 3);
        assert_eq!(EMPLOYEES[5].skill_years(), 2);
    }
}
