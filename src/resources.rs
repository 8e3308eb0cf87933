//! The collections the dashboard can browse and how each one is shown.

use chrono::{DateTime, Duration, TimeZone, Utc};
use deskboard_api::{Record, TableRecord};
use deskboard_ui::{ActionSlots, Column, ColumnError, ColumnSet, FormField};
use ratatui::layout::Constraint;
use serde_json::{Value, json};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const DEMO_RECORDS: usize = 23;

/// One browsable collection
#[derive(Debug, Clone)]
pub struct Resource {
    /// Sidebar and page title, e.g. `Users`
    pub title: &'static str,
    /// Used in modal titles and status messages, e.g. `User`
    pub singular: &'static str,
    /// Endpoint relative to the API base URL
    pub path: &'static str,
    /// Where new records are posted when it differs from `path`
    pub create_path: Option<&'static str>,
    /// Field naming a record in prompts such as the delete confirmation
    pub display_field: &'static str,
    pub columns: ColumnSet<Record>,
    pub no_data_text: &'static str,
    pub actions: ActionSlots,
    /// Fields offered by the new and edit forms
    pub fields: &'static [FormField],
    pub creatable: bool,
}

impl Resource {
    #[must_use]
    pub const fn can_edit(&self) -> bool {
        self.actions.edit && !self.fields.is_empty()
    }

    #[must_use]
    pub const fn can_create(&self) -> bool {
        self.creatable && !self.fields.is_empty()
    }
}

/// `2024-03-01T09:30:00Z` as `2024-03-01 09:30`; anything that is not RFC 3339
/// is shown as is
#[must_use]
pub fn format_timestamp(text: &str) -> String {
    DateTime::parse_from_rfc3339(text).map_or_else(
        |_| text.to_string(),
        |at| at.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string(),
    )
}

fn created_column() -> Column<Record> {
    Column::new("createdAt", "Created")
        .render(|record: &Record| {
            record
                .field("createdAt")
                .map(|text| format_timestamp(&text))
                .unwrap_or_default()
        })
        .sortable()
        .width(Constraint::Length(17))
}

fn image_column(key: &'static str, label: &'static str) -> Column<Record> {
    Column::new(key, label)
        .render(move |record: &Record| {
            let text = match record.field(key) {
                Some(url) if !url.trim().is_empty() => "[image]",
                Some(_) | None => "No image",
            };
            text.to_string()
        })
        .width(Constraint::Length(10))
}

fn text_column(key: &'static str, label: &'static str) -> Column<Record> {
    Column::new(key, label)
}

const USER_FIELDS: [FormField; 3] = [
    FormField::text("name", "Name").required(),
    FormField::text("email", "Email").required(),
    FormField::secret("password", "Password").required(),
];

const BANNER_FIELDS: [FormField; 3] = [
    FormField::text("mainTitle", "Main Title").required(),
    FormField::text("subtitle", "Subtitle"),
    FormField::text("highlight", "Highlight"),
];

const HERO_FIELDS: [FormField; 3] = [
    FormField::text("mainTitle", "Main Title").required(),
    FormField::text("description", "Description"),
    FormField::list("steps", "Steps"),
];

const TESTIMONIAL_FIELDS: [FormField; 7] = [
    FormField::text("name", "Name").required(),
    FormField::text("title", "Title"),
    FormField::text("image", "Image URL"),
    FormField::text("companyName", "Company Name"),
    FormField::text("companyLogo", "Company Logo URL"),
    FormField::text("titleReview", "Title Review"),
    FormField::text("reviewDescription", "Review Description"),
];

const PORTFOLIO_FIELDS: [FormField; 2] = [
    FormField::text("imageUrl", "Image URL").required(),
    FormField::text("alt", "Alt Text").required(),
];

const CATEGORY_FIELDS: [FormField; 5] = [
    FormField::text("category", "Category").required(),
    FormField::text("heading_title", "Heading Title"),
    FormField::text("heading_subtitle", "Heading Subtitle"),
    FormField::text("heading_description", "Description"),
    FormField::list("options", "Options"),
];

const PRICING_FIELDS: [FormField; 5] = [
    FormField::text("pricing", "Pricing"),
    FormField::text("pricingPackage", "Package"),
    FormField::text("priceTitle", "Price Title").required(),
    FormField::number("price", "Price"),
    FormField::text("description", "Description"),
];

const BLOG_FIELDS: [FormField; 3] = [
    FormField::text("title", "Title").required(),
    FormField::text("subtitle", "Subtitle"),
    FormField::text("image", "Image URL"),
];

const EDIT_DELETE: ActionSlots = ActionSlots {
    view: false,
    edit: true,
    delete: true,
};

const DELETE_ONLY: ActionSlots = ActionSlots {
    view: false,
    edit: false,
    delete: true,
};

const VIEW_DELETE: ActionSlots = ActionSlots {
    view: true,
    edit: false,
    delete: true,
};

/// Every collection, in sidebar order
pub fn catalogue() -> Result<Vec<Resource>, ColumnError> {
    Ok(vec![
        Resource {
            title: "Users",
            singular: "User",
            path: "users",
            create_path: Some("users/signup"),
            display_field: "name",
            columns: ColumnSet::new(vec![
                text_column("name", "Name").sortable(),
                text_column("email", "Email").sortable(),
                created_column(),
            ])?,
            no_data_text: "No users found",
            actions: EDIT_DELETE,
            fields: &USER_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Banners",
            singular: "Banner",
            path: "hero",
            create_path: None,
            display_field: "mainTitle",
            columns: ColumnSet::new(vec![
                text_column("mainTitle", "Main Title"),
                text_column("subtitle", "Subtitle"),
                text_column("highlight", "Highlight"),
                created_column(),
            ])?,
            no_data_text: "No banners found",
            actions: ActionSlots {
                view: false,
                edit: true,
                delete: false,
            },
            fields: &BANNER_FIELDS,
            creatable: false,
        },
        Resource {
            title: "Heroes",
            singular: "Hero",
            path: "process",
            create_path: None,
            display_field: "mainTitle",
            columns: ColumnSet::new(vec![
                text_column("mainTitle", "Main Title").sortable(),
                text_column("description", "Description"),
                text_column("steps", "Steps"),
                created_column(),
            ])?,
            no_data_text: "No heroes found",
            actions: EDIT_DELETE,
            fields: &HERO_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Testimonials",
            singular: "Testimonial",
            path: "testimonials",
            create_path: None,
            display_field: "name",
            columns: ColumnSet::new(vec![
                image_column("image", "Image"),
                text_column("name", "Name").sortable(),
                text_column("title", "Title"),
                image_column("companyLogo", "Company Logo"),
                text_column("companyName", "Company Name").sortable(),
                text_column("titleReview", "Title Review"),
                text_column("reviewDescription", "Review Description"),
                created_column(),
            ])?,
            no_data_text: "No testimonials found",
            actions: EDIT_DELETE,
            fields: &TESTIMONIAL_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Portfolio",
            singular: "Image",
            path: "images",
            create_path: None,
            display_field: "alt",
            columns: ColumnSet::new(vec![
                image_column("imageUrl", "Image"),
                text_column("alt", "Alt Text").sortable(),
                created_column(),
            ])?,
            no_data_text: "No images found",
            actions: EDIT_DELETE,
            fields: &PORTFOLIO_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Categories",
            singular: "Category",
            path: "ctgory",
            create_path: None,
            display_field: "category",
            columns: ColumnSet::new(vec![
                text_column("category", "Category").sortable(),
                text_column("heading_title", "Heading Title"),
                text_column("heading_subtitle", "Heading Subtitle"),
                text_column("heading_description", "Description"),
                text_column("options", "Options"),
                created_column(),
            ])?,
            no_data_text: "No categories found",
            actions: EDIT_DELETE,
            fields: &CATEGORY_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Services",
            singular: "Service",
            path: "services",
            create_path: None,
            display_field: "category",
            columns: ColumnSet::new(vec![
                text_column("category", "Category"),
                text_column("heading_title", "Heading Title"),
                text_column("heading_subtitle", "Heading Subtitle"),
                text_column("heading_description", "Description"),
                created_column(),
            ])?,
            no_data_text: "No services found",
            actions: VIEW_DELETE,
            fields: &[],
            creatable: false,
        },
        Resource {
            title: "Pricing",
            singular: "Price",
            path: "pricing",
            create_path: None,
            display_field: "priceTitle",
            columns: ColumnSet::new(vec![
                text_column("pricing", "Pricing"),
                text_column("pricingPackage", "Package").sortable(),
                text_column("priceTitle", "Price Title").sortable(),
                text_column("price", "Price")
                    .sortable()
                    .width(Constraint::Length(8)),
                text_column("description", "Description"),
                created_column(),
            ])?,
            no_data_text: "No pricing found",
            actions: ActionSlots {
                view: true,
                edit: true,
                delete: true,
            },
            fields: &PRICING_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Blogs",
            singular: "Blog",
            path: "blogs",
            create_path: None,
            display_field: "title",
            columns: ColumnSet::new(vec![
                image_column("image", "Image"),
                text_column("title", "Title").sortable(),
                text_column("subtitle", "Subtitle"),
                created_column(),
            ])?,
            no_data_text: "No blogs found",
            actions: EDIT_DELETE,
            fields: &BLOG_FIELDS,
            creatable: true,
        },
        Resource {
            title: "Messages",
            singular: "Message",
            path: "emails",
            create_path: None,
            display_field: "userEmail",
            columns: ColumnSet::new(vec![
                text_column("userEmail", "Email").sortable(),
                text_column("text", "Message"),
                created_column(),
            ])?,
            no_data_text: "No emails found",
            actions: DELETE_ONLY,
            fields: &[],
            creatable: false,
        },
        Resource {
            title: "Notifications",
            singular: "Notification",
            path: "bookcall",
            create_path: None,
            display_field: "name",
            columns: ColumnSet::new(vec![
                text_column("name", "Name").sortable(),
                text_column("email", "Email"),
                text_column("source", "Source").sortable(),
                created_column(),
            ])?,
            no_data_text: "No notifications found",
            actions: DELETE_ONLY,
            fields: &[],
            creatable: false,
        },
        Resource {
            title: "Orders",
            singular: "Order",
            path: "order",
            create_path: None,
            display_field: "name",
            columns: ColumnSet::new(vec![
                text_column("name", "Name").sortable(),
                text_column("email", "Email"),
                text_column("source", "Source").sortable(),
                created_column(),
            ])?,
            no_data_text: "No orders found",
            actions: DELETE_ONLY,
            fields: &[],
            creatable: false,
        },
    ])
}

const DEMO_PEOPLE: [&str; 8] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Turing",
    "Katherine Johnson",
    "Edsger Dijkstra",
    "Barbara Liskov",
    "Donald Knuth",
    "Margaret Hamilton",
];
const DEMO_SOURCES: [&str; 3] = ["Website", "Referral", "Newsletter"];
const DEMO_PACKAGES: [&str; 3] = ["Basic", "Standard", "Premium"];

fn pick(options: &[&'static str], i: usize) -> &'static str {
    options
        .get(i % options.len().max(1))
        .copied()
        .unwrap_or_default()
}

fn demo_value(key: &str, label: &str, i: usize) -> Value {
    let person = pick(&DEMO_PEOPLE, i);
    match key {
        "name" => json!(person),
        "email" | "userEmail" => json!(format!(
            "{}@example.com",
            person.to_lowercase().replace(' ', ".")
        )),
        "price" => json!((i % 5 + 1) * 25),
        "pricingPackage" => json!(pick(&DEMO_PACKAGES, i)),
        "source" => json!(pick(&DEMO_SOURCES, i)),
        "steps" | "options" => {
            json!([format!("{label} A{i}"), format!("{label} B{i}")])
        }
        "image" | "imageUrl" | "companyLogo" => {
            if i % 4 == 3 {
                json!("")
            } else {
                json!(format!("https://cdn.example.com/{key}/{i}.png"))
            }
        }
        _ => json!(format!("{label} {i}")),
    }
}

/// Seeded records for `--demo`, spread a day apart
#[must_use]
pub fn demo_records(resource: &Resource) -> Vec<Record> {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_default();

    (1..=DEMO_RECORDS)
        .map(|i| {
            let mut record = Record::new()
                .with("_id", format!("{}-{i}", resource.path));
            for column in resource.columns.iter() {
                if column.key() != "createdAt" {
                    record.insert(
                        column.key(),
                        demo_value(column.key(), column.label(), i),
                    );
                }
            }
            let created =
                start + Duration::days(i64::try_from(i).unwrap_or_default());
            record.insert("createdAt", created.to_rfc3339());
            record
        })
        .collect()
}
