//! Page templates and rendering

use minijinja::{context, Environment, Value};
use serde::Serialize;

use crate::auth::Session;
use crate::error::Result;
use crate::guard::Guard;

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }} · GeneTrust DNA Testing</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-slate-50 text-slate-800 min-h-screen">
    <nav class="bg-teal-700 text-white">
        <div class="max-w-6xl mx-auto px-4 py-3 flex items-center justify-between">
            <a href="/" class="font-bold text-lg">GeneTrust</a>
            <div class="flex items-center space-x-4 text-sm">
                {% for link in layout.nav %}
                <a href="{{ link.href }}" class="hover:underline">{{ link.label }}</a>
                {% endfor %}
                {% if layout.signed_in %}
                <span class="opacity-75">{{ layout.name }} ({{ layout.role }})</span>
                <form method="post" action="/logout">
                    <button class="px-2 py-1 bg-teal-900 rounded hover:bg-teal-800">Log out</button>
                </form>
                {% endif %}
            </div>
        </div>
    </nav>
    <main class="max-w-6xl mx-auto px-4 py-8">
        {% block content %}{% endblock %}
    </main>
    <footer class="text-center text-xs text-slate-500 py-6">GeneTrust DNA Testing Services</footer>
</body>
</html>"#;

const HOME_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<section class="text-center py-12">
    <h1 class="text-4xl font-bold text-teal-800">Accurate DNA testing you can trust</h1>
    <p class="mt-4 text-lg">Paternity, ancestry and legal DNA tests with home or clinic sample collection.</p>
    {% if layout.signed_in %}
    <a href="{{ dashboard }}" class="inline-block mt-6 px-6 py-3 bg-teal-600 text-white rounded">Go to your dashboard</a>
    {% else %}
    <a href="/register" class="inline-block mt-6 px-6 py-3 bg-teal-600 text-white rounded">Create an account</a>
    {% endif %}
</section>
{% endblock %}"#;

const PAGE_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1 class="text-3xl font-bold mb-6">{{ title }}</h1>
{% for paragraph in paragraphs %}
<p class="mb-4">{{ paragraph }}</p>
{% endfor %}
{% endblock %}"#;

const LOGIN_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<div class="max-w-md mx-auto bg-white shadow rounded p-6">
    <h1 class="text-2xl font-bold mb-4">Sign in</h1>
    {% if registered %}<p class="mb-4 text-green-700">Account created, you can sign in now.</p>{% endif %}
    {% if error %}<p class="mb-4 text-red-600">{{ error }}</p>{% endif %}
    <form method="post" action="/login" class="space-y-4">
        <input name="email" type="email" value="{{ email }}" placeholder="Email" class="w-full border rounded px-3 py-2" required>
        <input name="password" type="password" placeholder="Password" class="w-full border rounded px-3 py-2" required>
        <button class="w-full bg-teal-600 text-white rounded py-2">Sign in</button>
    </form>
    <p class="mt-4 text-sm">No account yet? <a href="/register" class="text-teal-700 underline">Register</a></p>
</div>
{% endblock %}"#;

const REGISTER_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<div class="max-w-md mx-auto bg-white shadow rounded p-6">
    <h1 class="text-2xl font-bold mb-4">Create an account</h1>
    {% if error %}<p class="mb-4 text-red-600">{{ error }}</p>{% endif %}
    <form method="post" action="/register" class="space-y-3">
        {% for field in fields %}
        <div>
            <input name="{{ field.name }}" type="{{ field.kind }}" value="{{ field.value }}" placeholder="{{ field.label }}" class="w-full border rounded px-3 py-2">
            {% if errors[field.name] %}<p class="text-sm text-red-600">{{ errors[field.name] }}</p>{% endif %}
        </div>
        {% endfor %}
        <button class="w-full bg-teal-600 text-white rounded py-2">Register</button>
    </form>
</div>
{% endblock %}"#;

const BOOKING_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<div class="max-w-xl mx-auto bg-white shadow rounded p-6">
    <h1 class="text-2xl font-bold mb-4">Book a DNA test</h1>
    {% if error %}<p class="mb-4 text-red-600">{{ error }}</p>{% endif %}
    <form method="post" action="/booking" class="space-y-3">
        <input name="full_name" value="{{ form.full_name }}" placeholder="Full name" class="w-full border rounded px-3 py-2">
        {% if errors.full_name %}<p class="text-sm text-red-600">{{ errors.full_name }}</p>{% endif %}
        <input name="phone" value="{{ form.phone }}" placeholder="Phone" class="w-full border rounded px-3 py-2">
        {% if errors.phone %}<p class="text-sm text-red-600">{{ errors.phone }}</p>{% endif %}
        <select name="service" class="w-full border rounded px-3 py-2">
            <option value="">Choose a test</option>
            {% for option in services %}
            <option value="{{ option.value }}" {% if option.value == form.service %}selected{% endif %}>{{ option.label }}</option>
            {% endfor %}
        </select>
        {% if errors.service %}<p class="text-sm text-red-600">{{ errors.service }}</p>{% endif %}
        <input name="appointment_date" type="date" value="{{ form.appointment_date }}" class="w-full border rounded px-3 py-2">
        {% if errors.appointment_date %}<p class="text-sm text-red-600">{{ errors.appointment_date }}</p>{% endif %}
        <div class="space-x-4">
            <label><input type="radio" name="collection" value="home" {% if form.collection == "home" %}checked{% endif %}> Home kit</label>
            <label><input type="radio" name="collection" value="clinic" {% if form.collection == "clinic" %}checked{% endif %}> At the clinic</label>
        </div>
        {% if errors.collection %}<p class="text-sm text-red-600">{{ errors.collection }}</p>{% endif %}
        <textarea name="notes" placeholder="Notes" class="w-full border rounded px-3 py-2">{{ form.notes }}</textarea>
        <button class="w-full bg-teal-600 text-white rounded py-2">Submit booking</button>
    </form>
</div>
{% endblock %}"#;

const DASHBOARD_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1 class="text-3xl font-bold mb-6">{{ title }}</h1>
<div class="grid grid-cols-1 md:grid-cols-3 gap-4">
    {% for view in views %}
    <a href="{{ view.href }}" class="block bg-white shadow rounded p-4 hover:bg-teal-50">
        <h2 class="font-semibold">{{ view.title }}</h2>
    </a>
    {% endfor %}
</div>
{% endblock %}"#;

const RESOURCE_LIST_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1 class="text-2xl font-bold mb-4">{{ title }}</h1>
{% if error %}<p class="mb-4 text-red-600">{{ error }}</p>{% endif %}
<table class="min-w-full bg-white shadow rounded text-sm">
    <thead>
        <tr class="bg-slate-100">
            {% for column in columns %}<th class="px-4 py-2 text-left">{{ column }}</th>{% endfor %}
            <th class="px-4 py-2"></th>
        </tr>
    </thead>
    <tbody>
        {% for row in rows %}
        <tr class="border-b">
            {% for cell in row.cells %}<td class="px-4 py-2">{{ cell }}</td>{% endfor %}
            <td class="px-4 py-2 flex space-x-2">
                <a href="{{ base_href }}/{{ row.id }}" class="text-teal-700 underline">View</a>
                {% if deletable %}
                <form method="post" action="{{ base_href }}/{{ row.id }}/delete">
                    <button class="text-red-600">Delete</button>
                </form>
                {% endif %}
            </td>
        </tr>
        {% else %}
        <tr><td class="px-4 py-6 text-center text-slate-500" colspan="{{ columns|length + 1 }}">Nothing here yet.</td></tr>
        {% endfor %}
    </tbody>
</table>
{% endblock %}"#;

const RESOURCE_DETAIL_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<a href="{{ base_href }}" class="text-teal-700 underline text-sm">&larr; Back to {{ title }}</a>
<h1 class="text-2xl font-bold my-4">{{ title }} #{{ id }}</h1>
{% if error %}<p class="mb-4 text-red-600">{{ error }}</p>{% endif %}
<dl class="bg-white shadow rounded divide-y">
    {% for field in fields %}
    <div class="px-4 py-2 grid grid-cols-3">
        <dt class="font-semibold">{{ field.label }}</dt>
        <dd class="col-span-2">{{ field.value }}</dd>
    </div>
    {% endfor %}
</dl>
{% endblock %}"#;

const PROFILE_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1 class="text-2xl font-bold mb-4">Your profile</h1>
<dl class="bg-white shadow rounded p-4 space-y-2">
    <div><dt class="font-semibold inline">Name:</dt> <dd class="inline">{{ layout.name }}</dd></div>
    <div><dt class="font-semibold inline">Role:</dt> <dd class="inline">{{ layout.role }}</dd></div>
    <div><dt class="font-semibold inline">User ID:</dt> <dd class="inline">{{ user_id }}</dd></div>
</dl>
{% endblock %}"#;

const NOT_FOUND_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<div class="text-center py-12">
    <h1 class="text-3xl font-bold">Page not found</h1>
    <p class="mt-4"><a href="/" class="text-teal-700 underline">Back to the home page</a></p>
</div>
{% endblock %}"#;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", BASE_TEMPLATE),
    ("home.html", HOME_TEMPLATE),
    ("page.html", PAGE_TEMPLATE),
    ("login.html", LOGIN_TEMPLATE),
    ("register.html", REGISTER_TEMPLATE),
    ("booking.html", BOOKING_TEMPLATE),
    ("dashboard.html", DASHBOARD_TEMPLATE),
    ("resource_list.html", RESOURCE_LIST_TEMPLATE),
    ("resource_detail.html", RESOURCE_DETAIL_TEMPLATE),
    ("profile.html", PROFILE_TEMPLATE),
    ("not_found.html", NOT_FOUND_TEMPLATE),
];

#[derive(Debug, Serialize)]
struct NavLink {
    href: &'static str,
    label: &'static str,
}

const NAV_CANDIDATES: &[(&str, &str)] = &[
    ("/services", "Services"),
    ("/blogs", "Blog"),
    ("/about", "About"),
    ("/booking", "Book a test"),
    ("/customer", "My account"),
    ("/staff", "Staff"),
    ("/manager", "Manager"),
    ("/admin", "Admin"),
    ("/profile", "Profile"),
    ("/login", "Sign in"),
    ("/register", "Register"),
];

/// Data every page shares: who is signed in and where they may go
#[derive(Debug, Serialize)]
struct Layout {
    signed_in: bool,
    name: String,
    role: String,
    nav: Vec<NavLink>,
}

impl Layout {
    fn new(session: &Session, guard: &Guard) -> Self {
        let nav = NAV_CANDIDATES
            .iter()
            .filter(|(href, _)| guard.check(href, session.role).is_allowed())
            .map(|&(href, label)| NavLink { href, label })
            .collect();

        Self {
            signed_in: !session.is_guest(),
            name: session.name.clone().unwrap_or_default(),
            role: session.role.to_string(),
            nav,
        }
    }
}

/// Compiled page templates
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render `name` with the shared layout merged into `ctx`
    pub fn render(&self, name: &str, session: &Session, guard: &Guard, ctx: Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        let layout = Layout::new(session, guard);
        Ok(template.render(context! { layout => layout, ..ctx })?)
    }
}
