// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成多期库存报表 CSV（eb_inventory_<month>_<year>.csv）
// 输出: 命令行第一个参数指定的目录，默认 tests/fixtures/datasets
// ==========================================

use csv::{Writer, WriterBuilder};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const FIRST_YEAR: i32 = 2015;
const LAST_YEAR: i32 = 2024;

const BANNER: &[&str] = &[
    "Employment-Based Immigrant Visa Inventory",
    "Applicants documentarily qualified and awaiting visa availability",
    "Source: National Visa Center",
];

const COUNTRIES: &[&str] = &["China", "India", "Mexico", "Philippines", "Rest of World"];

const CATEGORIES: &[&str] = &[
    "Priority Workers (EB1)",
    "Advanced Degree Professionals (EB2)",
    "Skilled Workers and Professionals (EB3)",
    "Other Workers (EW3)",
    "Certain Religious Workers (CRW)",
    "Investors (EB5)",
];

const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// 发布期（文件名中的月份 + 年份）
const PERIODS: &[(&str, i32)] = &[("march", 2023), ("november", 2023), ("march", 2024)];

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/datasets"));
    fs::create_dir_all(&out_dir)?;

    println!("开始生成测试数据集 -> {}", out_dir.display());

    for (index, (month, year)) in PERIODS.iter().enumerate() {
        let path = out_dir.join(format!("eb_inventory_{}_{}.csv", month, year));
        let rows = generate_period(&path, index)?;
        println!("✓ 生成 {} ({}行)", path.display(), rows);
    }

    let path = out_dir.join("eb_inventory_edge_cases.csv");
    generate_edge_cases(&path)?;
    println!("✓ 生成 {} (缺失字段/非法月份/无法解析计数)", path.display());

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn writer_for(path: &Path) -> Result<Writer<fs::File>, Box<dyn Error>> {
    let mut wtr = WriterBuilder::new().flexible(true).from_path(path)?;
    for line in BANNER {
        wtr.write_record([*line])?;
    }
    let mut header = vec![
        "Country Of Chargeability".to_string(),
        "Preference Category".to_string(),
        "Visa Status".to_string(),
        "Priority Date Month".to_string(),
    ];
    header.extend((FIRST_YEAR..=LAST_YEAR).map(|y| format!("Priority Date Year - {}", y)));
    wtr.write_record(&header)?;
    Ok(wtr)
}

/// 每个国家 × 类别 × 月份一行；计数由下标确定，便于复现
fn generate_period(path: &Path, period_index: usize) -> Result<usize, Box<dyn Error>> {
    let mut wtr = writer_for(path)?;
    let mut rows = 0;

    for (ci, country) in COUNTRIES.iter().enumerate() {
        for (ki, category) in CATEGORIES.iter().enumerate() {
            for (mi, month) in MONTHS.iter().enumerate() {
                let mut record = vec![
                    country.to_string(),
                    category.to_string(),
                    "Pending".to_string(),
                    month.to_string(),
                ];
                for year in FIRST_YEAR..=LAST_YEAR {
                    let seed = ci * 131 + ki * 17 + mi * 7 + (year - FIRST_YEAR) as usize * 3;
                    // 较新的发布期库存逐步消化
                    let count = (seed % 97) * (PERIODS.len() + 1 - period_index);
                    if seed % 11 == 0 {
                        record.push(String::new());
                    } else if count >= 1000 {
                        record.push(format_thousands(count));
                    } else {
                        record.push(count.to_string());
                    }
                }
                wtr.write_record(&record)?;
                rows += 1;
            }
        }
    }

    wtr.flush()?;
    Ok(rows)
}

fn generate_edge_cases(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for(path)?;
    let years = (LAST_YEAR - FIRST_YEAR + 1) as usize;
    let filled = |value: &str| vec![value.to_string(); years];

    let rows: Vec<(&str, &str, &str, Vec<String>)> = vec![
        ("India", "Advanced Degree Professionals (EB2)", "March", filled("12")),
        ("", "Priority Workers (EB1)", "April", filled("5")),
        ("China", "", "May", filled("5")),
        ("Mexico", "Investors (EB5)", "Smarch", filled("5")),
        ("Philippines", "Other Workers (EW3)", "july", filled("n/a")),
        ("Rest of World", "Skilled Workers (EB3)", " Sept ", filled("1,234")),
    ];

    for (country, category, month, counts) in rows {
        let mut record = vec![
            country.to_string(),
            category.to_string(),
            "Pending".to_string(),
            month.to_string(),
        ];
        record.extend(counts);
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
