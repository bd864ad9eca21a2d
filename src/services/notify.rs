use crate::models::{Booking, Frequency, Language};
use crate::services::pricing::{self, PlanTier};

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub struct Email {
    pub subject: String,
    pub body: String,
}

fn frequency_label(frequency: Frequency, language: Language) -> String {
    match (frequency, language) {
        (Frequency::Custom, Language::English) => "7+ (Custom Quote)".to_string(),
        (Frequency::Custom, Language::Chinese) => "7次以上 (联系定制)".to_string(),
        (Frequency::PerWeek(1), Language::English) => "1 visit/week".to_string(),
        (Frequency::PerWeek(n), Language::English) => format!("{n} visits/week"),
        (Frequency::PerWeek(n), Language::Chinese) => format!("{n} 次/周"),
    }
}

fn weekly_price(booking: &Booking, language: Language) -> String {
    pricing::compute_price(
        PlanTier::from_label(&booking.plan),
        booking.num_cats,
        booking.frequency,
    )
    .display(language)
}

/// New-lead notification for the operator. Always Chinese, the operator's
/// working language, regardless of the customer's selection.
pub fn owner_notification(booking: &Booking) -> Email {
    let body = format!(
        "\
新服务预约申请

{DIVIDER}

客户信息
{DIVIDER}

姓名：{name}
电话：{phone}
邮箱：{email}
地址：{address}

服务详情
{DIVIDER}

选择方案：{plan}
猫咪数量：{num_cats}
每周期数：{frequency}
首选时间：{time_of_day}
每周费用：{price}
语言偏好：{language}
备注：{notes}

{DIVIDER}

提交时间：{created_at}
请尽快联系客户进行确认。
",
        name = booking.name,
        phone = booking.phone.as_deref().unwrap_or("无"),
        email = booking.email.as_deref().unwrap_or("无"),
        address = booking.address,
        plan = booking.plan,
        num_cats = booking.num_cats,
        frequency = frequency_label(booking.frequency, Language::Chinese),
        time_of_day = booking.time_of_day.as_str(),
        price = weekly_price(booking, Language::Chinese),
        language = booking.language.as_str(),
        notes = booking.notes.as_deref().unwrap_or("无"),
        created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S"),
    );

    Email {
        subject: format!("新预约 - {}", booking.plan),
        body,
    }
}

/// Confirmation for the customer, in the language they filled the form in.
pub fn customer_confirmation(booking: &Booking) -> Email {
    match booking.language {
        Language::English => customer_confirmation_en(booking),
        Language::Chinese => customer_confirmation_cn(booking),
    }
}

fn customer_confirmation_en(booking: &Booking) -> Email {
    let body = format!(
        "\
🐾 ScooPo
Melbourne's Premium Pet Cleaning Service

{DIVIDER}

✅ BOOKING CONFIRMED!

Hi {name},

Thank you for choosing ScooPo! We've received your booking request and our
team will contact you within 24 hours to confirm your service schedule.

{DIVIDER}

📋 YOUR BOOKING DETAILS

Plan: {plan}
Number of Cats: {num_cats}
Visits per Week: {frequency}
Weekly Total: {price}
Service Address: {address}
Contact Phone: {phone}
Contact Email: {email}

{DIVIDER}

🎯 WHAT HAPPENS NEXT?

1. Our team will review your booking details
2. We'll call you within 24 hours to confirm your schedule
3. You'll receive a confirmation with your first service date
4. Sit back and relax - we'll take care of the rest! 😊

{DIVIDER}

💬 QUESTIONS?

Simply reply to this email - we're here to help!

{DIVIDER}

ScooPo Pet Cleaning
Serving Box Hill & Blackburn Area
",
        name = booking.name,
        plan = booking.plan,
        num_cats = booking.num_cats,
        frequency = frequency_label(booking.frequency, Language::English),
        price = weekly_price(booking, Language::English),
        address = booking.address,
        phone = booking.phone.as_deref().unwrap_or("-"),
        email = booking.email.as_deref().unwrap_or("-"),
    );

    Email {
        subject: "Booking Confirmed - ScooPo Pet Cleaning Service".to_string(),
        body,
    }
}

fn customer_confirmation_cn(booking: &Booking) -> Email {
    let body = format!(
        "\
🐾 ScooPo
墨尔本优质宠物清洁服务

{DIVIDER}

✅ 预约已确认！

您好 {name}，

感谢您选择 ScooPo！我们已收到您的预约申请，我们的团队将在 24 小时内与您联系，确认服务时间安排。

{DIVIDER}

📋 您的预约详情

服务方案：{plan}
猫咪数量：{num_cats}
每周期数：{frequency}
每周费用：{price}
服务地址：{address}
联系电话：{phone}
联系邮箱：{email}

{DIVIDER}

🎯 接下来会发生什么？

1. 我们的团队将审核您的预约详情
2. 我们将在 24 小时内致电您确认服务时间
3. 您将收到首次服务日期的确认
4. 请放心 - 剩下的交给我们！😊

{DIVIDER}

💬 有疑问？

直接回复此邮件即可 - 我们随时为您服务！

{DIVIDER}

ScooPo 宠物清洁
服务区域：Box Hill 和 Blackburn
",
        name = booking.name,
        plan = booking.plan,
        num_cats = booking.num_cats,
        frequency = frequency_label(booking.frequency, Language::Chinese),
        price = weekly_price(booking, Language::Chinese),
        address = booking.address,
        phone = booking.phone.as_deref().unwrap_or("-"),
        email = booking.email.as_deref().unwrap_or("-"),
    );

    Email {
        subject: "预约确认 - ScooPo 宠物清洁服务".to_string(),
        body,
    }
}
