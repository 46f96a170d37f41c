use crate::cart::Cart;
use crate::donation::PRESET_AMOUNTS;
use crate::state::EcoState;

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty. Start saving the planet!";
/// Fade-out time on the login page before navigating to the landing page.
pub const LOGIN_REDIRECT_DELAY_MS: u64 = 450;

pub fn render_index(data: &EcoState) -> String {
    let chart = serde_json::to_string(&data.chart.spec).unwrap_or_else(|_| "null".to_string());
    let presets = PRESET_AMOUNTS
        .iter()
        .map(|amount| {
            let selected = if data.selected_preset == Some(*amount) { " selected" } else { "" };
            format!(r#"<button class="donate-btn{selected}" data-amount="{amount}">${amount}</button>"#)
        })
        .collect::<Vec<_>>()
        .join("\n          ");

    INDEX_HTML
        .replace("{{CO2}}", &data.climate.co2_display())
        .replace("{{TEMP}}", &data.climate.temperature_display())
        .replace("{{TREES}}", &data.trees.display())
        .replace("{{CART_COUNT}}", &data.cart.item_count().to_string())
        .replace("{{CART_TOTAL}}", &data.cart.total_display())
        .replace("{{PRESETS}}", &presets)
        .replace("{{CHART}}", &escape_script_json(&chart))
        .replace("{{CART_ITEMS}}", &render_cart_items(&data.cart))
}

pub fn render_login() -> String {
    LOGIN_HTML.replace("{{DELAY_MS}}", &LOGIN_REDIRECT_DELAY_MS.to_string())
}

pub fn render_cart_items(cart: &Cart) -> String {
    if cart.is_empty() {
        return format!(r#"<p class="empty-cart">{EMPTY_CART_MESSAGE}</p>"#);
    }

    cart.items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = escape_html(&item.name);
            format!(
                r#"<div class="cart-item">
  <img src="{image}" alt="{name}" style="width:64px;height:64px;object-fit:cover;">
  <div class="cart-item-info">
    <h4>{name}</h4>
    <p>${price} × {quantity}</p>
  </div>
  <button class="remove-item" data-index="{index}">×</button>
</div>"#,
                image = escape_html(&item.image),
                price = item.price,
                quantity = item.quantity,
            )
        })
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>EcoGuard</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    :root {
      --forest: #0a4d3c;
      --leaf: #1b5e20;
      --mint: #e0f2e9;
      --ink: #1f2a24;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      color: var(--ink);
      background: linear-gradient(180deg, var(--mint), #f7fbf8 40%);
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 18px 32px;
      background: var(--forest);
      color: white;
    }

    header h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    main {
      width: min(1080px, 100%);
      margin: 0 auto;
      padding: 32px 18px 64px;
      display: grid;
      gap: 40px;
    }

    .stats,
    .products {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 18px;
    }

    .stat,
    .product {
      background: var(--card);
      border-radius: 18px;
      padding: 20px;
      box-shadow: 0 12px 30px rgba(10, 77, 60, 0.12);
    }

    .stat .value {
      display: block;
      font-size: 1.8rem;
      font-weight: 700;
      color: var(--forest);
    }

    .product img {
      width: 100%;
      height: 160px;
      object-fit: cover;
      border-radius: 12px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-buy,
    .checkout-btn,
    #payNow,
    #login-btn {
      background: var(--forest);
      color: white;
    }

    #login-btn {
      background: white;
      color: var(--forest);
    }

    .donate-btn {
      background: var(--mint);
      color: var(--forest);
    }

    .donate-btn.selected {
      background: var(--forest);
      color: white;
    }

    #cartIcon {
      position: fixed;
      right: 18px;
      bottom: 18px;
      background: var(--forest);
      color: white;
      padding: 14px 18px;
      z-index: 9998;
    }

    #cartCount {
      position: fixed;
      right: 18px;
      top: 18px;
      background: var(--forest);
      color: #fff;
      padding: 6px 8px;
      border-radius: 20px;
      z-index: 9999;
    }

    .cart-overlay {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.35);
      display: none;
    }

    .cart-overlay.active {
      display: block;
    }

    .cart-sidebar {
      position: fixed;
      top: 0;
      right: -420px;
      width: min(400px, 100%);
      height: 100%;
      background: white;
      padding: 24px;
      overflow-y: auto;
      transition: right 250ms ease;
      z-index: 10000;
    }

    .cart-sidebar.open {
      right: 0;
    }

    .cart-item {
      display: flex;
      gap: 12px;
      align-items: center;
      padding: 12px 0;
      border-bottom: 1px solid #e5ece8;
    }

    .cart-item-info {
      flex: 1;
    }

    .donation {
      display: grid;
      gap: 16px;
      background: var(--card);
      border-radius: 18px;
      padding: 24px;
    }

    .notice {
      min-height: 1.2em;
      color: var(--leaf);
      font-weight: 600;
    }

    .notice.error {
      color: #b3261e;
    }
  </style>
</head>
<body>
  <header>
    <h1>EcoGuard</h1>
    <button id="login-btn" type="button">Log in</button>
  </header>

  <main>
    <section class="stats">
      <div class="stat">
        <span class="label">Atmospheric CO2</span>
        <span class="value" id="co2">{{CO2}}</span>
      </div>
      <div class="stat">
        <span class="label">Temperature anomaly</span>
        <span class="value" id="temp">{{TEMP}}</span>
      </div>
      <div class="stat">
        <span class="label">Trees lost this year</span>
        <span class="value" id="trees">{{TREES}}</span>
      </div>
    </section>

    <section class="products">
      <div class="product">
        <img src="https://images.unsplash.com/photo-1542601906990-b4d3fb778b09?w=400" alt="Tree Planting Kit" />
        <h3>Tree Planting Kit</h3>
        <p class="price">$29.99</p>
        <button class="btn-buy" type="button">Add to cart</button>
      </div>
      <div class="product">
        <img src="https://images.unsplash.com/photo-1509391366360-2e959784a276?w=400" alt="Solar Charger" />
        <h3>Solar Charger</h3>
        <p class="price">$49.00</p>
        <button class="btn-buy" type="button">Add to cart</button>
      </div>
      <div class="product">
        <img src="https://images.unsplash.com/photo-1532996122724-e3c354a0b15b?w=400" alt="Compost Starter" />
        <h3>Compost Starter</h3>
        <p class="price">$19.50</p>
        <button class="btn-buy" type="button">Add to cart</button>
      </div>
    </section>

    <section class="donation">
      <h2>Support the mission</h2>
      <div class="presets">
          {{PRESETS}}
      </div>
      <input id="customAmount" type="number" min="1" step="any" placeholder="Custom amount ($)" />
      <button id="payNow" type="button">Donate Securely (Fake)</button>
      <p class="notice" id="notice"></p>
      <canvas id="donationChart" width="420" height="420"></canvas>
    </section>
  </main>

  <button id="cartIcon" type="button">Cart</button>
  <div id="cartCount">{{CART_COUNT}}</div>
  <div class="cart-overlay" id="cartOverlay"></div>
  <div class="cart-sidebar" id="cartSidebar">
    <div class="cart-header">
      <h2>Your Cart (<span id="sidebarCount">{{CART_COUNT}}</span>)</h2>
      <button class="close-cart" id="closeCart" type="button">×</button>
    </div>
    <div id="cartItems">{{CART_ITEMS}}</div>
    <div class="cart-total">Total: $<span id="cartTotal">{{CART_TOTAL}}</span></div>
    <button class="checkout-btn" id="checkoutBtn" type="button">Proceed to Checkout</button>
  </div>

  <script>
    const $ = (id) => document.getElementById(id);
    const setText = (id, text) => {
      const el = $(id);
      if (el) el.textContent = text;
    };

    const notice = (message, kind) => {
      const el = $('notice');
      if (!el) return;
      el.textContent = message || '';
      el.className = kind === 'error' ? 'notice error' : 'notice';
    };

    const request = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const refreshCounters = async () => {
      const counters = await request('GET', '/api/counters');
      setText('co2', counters.co2);
      setText('temp', counters.temperature);
      setText('trees', counters.trees);
    };

    const updateCartUI = (cart) => {
      setText('cartCount', cart.item_count);
      setText('sidebarCount', cart.item_count);
      setText('cartTotal', cart.total);
      const items = $('cartItems');
      if (items) items.innerHTML = cart.items_html;
    };

    let chart = null;
    let chartGeneration = 0;

    const drawChart = (spec, generation) => {
      const canvas = $('donationChart');
      if (!canvas || !spec || typeof Chart === 'undefined') return;
      if (generation !== undefined && generation === chartGeneration && chart) return;
      if (chart) chart.destroy();
      chartGeneration = generation || chartGeneration;
      chart = new Chart(canvas.getContext('2d'), {
        type: 'pie',
        data: {
          labels: spec.labels,
          datasets: [{
            data: spec.values,
            backgroundColor: spec.colors,
            borderColor: '#fff',
            borderWidth: 3,
            hoverOffset: 20
          }]
        },
        options: {
          responsive: true,
          plugins: {
            legend: { position: 'bottom', labels: { padding: 20, font: { size: 13 } } },
            title: { display: true, text: spec.title, font: { size: 20, weight: 'bold' }, color: '#0a4d3c', padding: 20 },
            tooltip: {
              callbacks: {
                label: (context) => {
                  const actual = (context.parsed / 100) * spec.total_raised;
                  return `$${actual.toLocaleString(undefined, { maximumFractionDigits: 0 })} donated`;
                }
              }
            }
          }
        }
      });
    };

    const openCart = () => {
      $('cartSidebar').classList.add('open');
      $('cartOverlay').classList.add('active');
      request('GET', '/api/cart').then(updateCartUI).catch((err) => console.error(err));
    };

    const closeCart = () => {
      $('cartSidebar').classList.remove('open');
      $('cartOverlay').classList.remove('active');
    };

    document.querySelectorAll('.btn-buy').forEach((button) => {
      button.addEventListener('click', () => {
        const product = button.closest('.product') || button.parentElement;
        const nameEl = product ? product.querySelector('h3') : null;
        const priceEl = product ? product.querySelector('.price') : null;
        const imageEl = product ? product.querySelector('img') : null;
        request('POST', '/api/cart', {
          name: nameEl ? nameEl.textContent : null,
          price: priceEl ? priceEl.textContent : button.textContent,
          image: imageEl && imageEl.src ? imageEl.src : null
        })
          .then((cart) => {
            updateCartUI(cart);
            if (cart.notice) notice(cart.notice, 'ok');
          })
          .catch((err) => notice(err.message, 'error'));
      });
    });

    const cartItems = $('cartItems');
    if (cartItems) {
      cartItems.addEventListener('click', (event) => {
        if (!event.target.classList.contains('remove-item')) return;
        request('DELETE', `/api/cart/${event.target.dataset.index}`)
          .then(updateCartUI)
          .catch((err) => notice(err.message, 'error'));
      });
    }

    $('cartIcon').addEventListener('click', openCart);
    $('closeCart').addEventListener('click', closeCart);
    $('cartOverlay').addEventListener('click', closeCart);

    document.querySelectorAll('.donate-btn').forEach((button) => {
      button.addEventListener('click', () => {
        request('POST', '/api/donations/select', { amount: parseFloat(button.dataset.amount) })
          .then(() => {
            document.querySelectorAll('.donate-btn').forEach((b) => b.classList.remove('selected'));
            button.classList.add('selected');
            const input = $('customAmount');
            if (input) input.value = '';
          })
          .catch((err) => notice(err.message, 'error'));
      });
    });

    const payNow = $('payNow');
    if (payNow) {
      payNow.addEventListener('click', () => {
        const input = $('customAmount');
        const typed = input ? parseFloat(input.value) : NaN;
        request('POST', '/api/donations', { custom_amount: Number.isFinite(typed) ? typed : null })
          .then((donations) => {
            drawChart(donations.chart, donations.chart_generation);
            notice(donations.notice, 'ok');
            payNow.textContent = 'Thank You!';
            setTimeout(() => { payNow.textContent = 'Donate Securely (Fake)'; }, 3000);
          })
          .catch((err) => notice(err.message, 'error'))
          .finally(() => { if (input) input.value = ''; });
      });
    }

    document.addEventListener('click', (event) => {
      if (event.target.id === 'login-btn') {
        window.location.href = '/login';
      }
    });

    drawChart({{CHART}});
    setInterval(() => refreshCounters().catch((err) => console.error(err)), 1000);
  </script>
</body>
</html>
"##;

const LOGIN_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>EcoGuard · Log in</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      display: grid;
      place-items: center;
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      background: #e0f2e9;
      transition: opacity 400ms ease;
    }

    body.fade-out {
      opacity: 0;
    }

    form {
      display: grid;
      gap: 12px;
      width: min(340px, 90vw);
      background: white;
      padding: 28px;
      border-radius: 18px;
      box-shadow: 0 12px 30px rgba(10, 77, 60, 0.12);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px;
      background: #0a4d3c;
      color: white;
      font-weight: 600;
      cursor: pointer;
    }
  </style>
</head>
<body>
  <form id="loginForm">
    <h1>Welcome back</h1>
    <input type="email" name="email" placeholder="Email" required />
    <input type="password" name="password" placeholder="Password" required />
    <button type="submit">Log in</button>
  </form>

  <script>
    document.getElementById('loginForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      let target = '/';
      try {
        const res = await fetch('/api/login', { method: 'POST' });
        if (res.ok) {
          const session = await res.json();
          target = session.redirect || target;
        }
      } catch (err) {
        console.error(err);
      }
      document.body.classList.add('fade-out');
      setTimeout(() => { window.location.href = target; }, {{DELAY_MS}});
    });
  </script>
</body>
</html>
"##;
