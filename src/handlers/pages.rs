//! Minimal page shells. The real UI is rendered elsewhere; these exist so
//! the auth gate's page-redirect branch has a concrete surface.

use axum::response::Html;

pub async fn login_page() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin Login</title></head>
<body>
  <h1>Admin Login</h1>
  <form id="login-form">
    <label>Username <input name="username" autocomplete="username"></label>
    <label>Password <input name="password" type="password" autocomplete="current-password"></label>
    <button type="submit">Sign in</button>
  </form>
  <p><a href="/api/auth/oauth">Sign in with Google</a></p>
  <script>
    document.getElementById('login-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const response = await fetch('/api/login', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ username: form.get('username'), password: form.get('password') }),
      });
      if (response.redirected) { window.location = response.url; }
      else if (response.ok) { window.location = '/admin'; }
      else { alert('Invalid credentials'); }
    });
  </script>
</body>
</html>"#,
    )
}

pub async fn admin_page() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin</title></head>
<body>
  <h1>Admin</h1>
  <ul>
    <li><a href="/api/admin/inquiries">Inquiries</a></li>
    <li><a href="/api/admin/templates">Templates</a></li>
    <li><a href="/api/admin/portfolio">Portfolio</a></li>
  </ul>
  <form method="post" action="/api/logout"><button type="submit">Log out</button></form>
</body>
</html>"#,
    )
}
