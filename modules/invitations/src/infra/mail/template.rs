//! Invitation email rendering.

/// Renders the invitation email body. Self-contained HTML with inline
/// styles so it survives email clients that strip external stylesheets.
pub fn invite_email_html(inviter_name: &str, accept_url: &str, decline_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .button {{
      display: inline-block;
      padding: 12px 24px;
      margin: 10px 5px;
      text-decoration: none;
      border-radius: 5px;
      font-weight: bold;
    }}
    .accept {{ background-color: #10b981; color: white; }}
    .decline {{ background-color: #ef4444; color: white; }}
  </style>
</head>
<body>
  <div class="container">
    <h2>Partnership Invitation</h2>
    <p><strong>{inviter_name}</strong> would like to add you as a partner.</p>
    <p>Click below to respond to this invitation:</p>
    <div style="margin: 30px 0;">
      <a href="{accept_url}" class="button accept">Accept Partnership</a>
      <a href="{decline_url}" class="button decline">Decline</a>
    </div>
    <p style="color: #666; font-size: 14px;">This invitation will expire in 7 days.</p>
  </div>
</body>
</html>
"##
    )
}

pub fn invite_email_subject(inviter_name: &str) -> String {
    format!("{inviter_name} invited you to be partners")
}
